//! Player, pet, and the stat and progression pieces they share.

pub mod buffs;
pub mod pet;
pub mod player;
pub mod progression;
pub mod stats;

pub use buffs::*;
pub use pet::*;
pub use player::*;
pub use progression::*;
pub use stats::*;
