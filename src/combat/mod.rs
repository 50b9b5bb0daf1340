//! Encounters: combatant interface, monster factory and the turn resolver.

pub mod monster;
pub mod resolver;
pub mod types;

pub use monster::*;
pub use resolver::*;
pub use types::*;
