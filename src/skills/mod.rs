//! Skill registry: skill definitions, per-combatant books and mana.

pub mod book;
pub mod types;

pub use book::*;
pub use types::*;
