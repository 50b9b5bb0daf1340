//! Combat balance simulator for Monte Carlo analysis.
//!
//! Run thousands of simulated fights to analyze:
//! - Win, loss and flee rates against the spawn mix
//! - Experience and level pacing
//! - Observed drop rates per item
//!
//! The simulator drives `CombatSystem` (src/combat/resolver.rs) for all game
//! logic, so results match real gameplay behavior.

mod config;
mod report;
mod runner;
mod spawner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats, SimError};
pub use spawner::Spawner;
