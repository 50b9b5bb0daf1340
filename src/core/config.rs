//! Runtime-tunable encounter settings.

use super::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs the combat resolver reads on every encounter.
///
/// Missing fields fall back to the compiled-in defaults, so a partial JSON
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// A flee attempt succeeds when a uniform draw is above this value.
    pub flee_fail_threshold: f64,
    /// Probability that a defeated monster's loot table is rolled at all.
    pub drop_check_chance: f64,
    /// HP restored by one health potion.
    pub potion_heal: u32,
    /// Minimum pet loyalty for assists.
    pub pet_loyalty_threshold: u32,
    /// Fraction of the monster's experience granted to the pet.
    pub pet_exp_share: f64,
    /// Suggested wait before the monster acts.
    pub monster_turn_delay_ms: u64,
    /// Suggested wait between the outcome and returning to idle.
    pub settle_delay_ms: u64,
    /// Suggested display time of a single action event.
    pub action_display_ms: u64,
    /// Suggested display time of the encounter-start event.
    pub encounter_start_display_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            flee_fail_threshold: FLEE_FAIL_THRESHOLD,
            drop_check_chance: DROP_CHECK_CHANCE,
            potion_heal: POTION_HEAL_AMOUNT,
            pet_loyalty_threshold: PET_LOYALTY_THRESHOLD,
            pet_exp_share: PET_EXP_SHARE,
            monster_turn_delay_ms: MONSTER_TURN_DELAY_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            action_display_ms: ACTION_DISPLAY_MS,
            encounter_start_display_ms: ENCOUNTER_START_DISPLAY_MS,
        }
    }
}

impl CombatConfig {
    /// Parses a config from JSON, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn monster_turn_delay(&self) -> Duration {
        Duration::from_millis(self.monster_turn_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
