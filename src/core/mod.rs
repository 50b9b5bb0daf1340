//! Shared constants, arithmetic, configuration and error types.

pub mod combat_math;
pub mod config;
pub mod constants;
pub mod error;

pub use config::CombatConfig;
pub use error::{CombatError, EquipmentError};
