//! Experience ladder shared by the player and the pet.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Fixed stat increments applied on every level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpGains {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub loyalty: u32,
}

pub const PLAYER_LEVEL_UP_GAINS: LevelUpGains = LevelUpGains {
    max_hp: PLAYER_HP_PER_LEVEL,
    attack: PLAYER_ATTACK_PER_LEVEL,
    defense: PLAYER_DEFENSE_PER_LEVEL,
    loyalty: 0,
};

pub const PET_LEVEL_UP_GAINS: LevelUpGains = LevelUpGains {
    max_hp: PET_HP_PER_LEVEL,
    attack: PET_ATTACK_PER_LEVEL,
    defense: PET_DEFENSE_PER_LEVEL,
    loyalty: PET_LOYALTY_PER_LEVEL,
};

/// Experience threshold after `current`: floor(current * 1.5), always
/// strictly larger than `current`.
pub fn next_threshold(current: u64) -> u64 {
    let grown = (current as f64 * NEXT_LEVEL_EXP_GROWTH).floor() as u64;
    grown.max(current.saturating_add(1))
}

/// Level, banked experience and the threshold for the next level.
///
/// `exp < next_level_exp` holds after every `gain_exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub level: u32,
    pub exp: u64,
    pub next_level_exp: u64,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self {
            level: 1,
            exp: 0,
            next_level_exp: STARTING_NEXT_LEVEL_EXP,
        }
    }

    /// Builds a state at an arbitrary point on the ladder, normalizing any
    /// surplus experience into level-ups.
    pub fn at(level: u32, exp: u64, next_level_exp: u64) -> Self {
        let mut state = Self {
            level,
            exp: 0,
            next_level_exp: next_level_exp.max(1),
        };
        state.gain_exp(exp);
        state
    }

    /// Adds experience and applies level-ups one at a time until the
    /// threshold is out of reach. Returns the number of levels gained.
    pub fn gain_exp(&mut self, amount: u64) -> u32 {
        self.exp = self.exp.saturating_add(amount);
        let mut gained = 0;
        while self.exp >= self.next_level_exp {
            self.exp -= self.next_level_exp;
            self.level += 1;
            self.next_level_exp = next_threshold(self.next_level_exp);
            gained += 1;
        }
        gained
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_level_one() {
        let state = ProgressionState::new();
        assert_eq!(state.level, 1);
        assert_eq!(state.exp, 0);
        assert_eq!(state.next_level_exp, 100);
    }

    #[test]
    fn test_single_level_up_carries_surplus() {
        let mut state = ProgressionState::at(1, 90, 100);
        assert_eq!(state.gain_exp(50), 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.exp, 40);
        assert_eq!(state.next_level_exp, 150);
    }

    #[test]
    fn test_multiple_level_ups_in_one_call() {
        let mut state = ProgressionState::new();
        // 100 + 150 + 225 = 475
        assert_eq!(state.gain_exp(480), 3);
        assert_eq!(state.level, 4);
        assert_eq!(state.exp, 5);
        assert_eq!(state.next_level_exp, 337);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut state = ProgressionState::new();
        assert_eq!(state.gain_exp(100), 1);
        assert_eq!(state.exp, 0);
    }

    #[test]
    fn test_split_grants_match_single_grant() {
        for x in [1u64, 7, 50, 99, 100, 333, 1000, 12345] {
            let mut once = ProgressionState::new();
            once.gain_exp(2 * x);
            let mut twice = ProgressionState::new();
            twice.gain_exp(x);
            twice.gain_exp(x);
            assert_eq!(once, twice, "x = {x}");
        }
    }

    #[test]
    fn test_threshold_strictly_increases() {
        let mut threshold = 1;
        for _ in 0..40 {
            let next = next_threshold(threshold);
            assert!(next > threshold);
            threshold = next;
        }
    }

    #[test]
    fn test_invariant_holds_after_gain() {
        let mut state = ProgressionState::new();
        for amount in [0u64, 5, 95, 1_000, 77_777] {
            state.gain_exp(amount);
            assert!(state.exp < state.next_level_exp);
        }
    }

    #[test]
    fn test_at_normalizes_surplus() {
        // 250 - 100 leaves exactly the second threshold (150)
        let state = ProgressionState::at(1, 250, 100);
        assert_eq!(state.level, 3);
        assert_eq!(state.exp, 0);
        assert_eq!(state.next_level_exp, 225);
    }
}
