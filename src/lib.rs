//! Skirmish - turn-based RPG combat and progression engine.
//!
//! This module exposes the game logic for front ends, tests and the balance
//! simulator.

pub mod character;
pub mod combat;
pub mod core;
pub mod items;
pub mod simulator;
pub mod skills;
