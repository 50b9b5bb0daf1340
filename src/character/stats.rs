use crate::core::combat_math::{apply_damage, apply_heal};
use serde::{Deserialize, Serialize};

/// Numeric profile shared by every combatant.
///
/// `current_hp <= max_hp` holds after every method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub level: u32,
    pub max_hp: u32,
    pub current_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatBlock {
    /// Creates a fully healed stat block.
    pub fn new(level: u32, max_hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            level,
            max_hp,
            current_hp: max_hp,
            attack,
            defense,
            speed,
        }
    }

    /// Removes HP, returning how much was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = apply_damage(self.current_hp, amount);
        before - self.current_hp
    }

    /// Restores HP up to `max_hp`, returning how much was actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = apply_heal(self.current_hp, amount, self.max_hp);
        self.current_hp - before
    }

    pub fn restore_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    /// Current HP as a fraction of max, 0.0 when max is 0.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.current_hp as f64 / self.max_hp as f64
        }
    }
}
