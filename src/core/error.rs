//! Error types for combat and equipment operations.
//!
//! Every variant is an advisory no-op: the engine state is left untouched and
//! the `Display` text is what the player gets to read.

use crate::items::types::ItemId;

/// Reasons a combat action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// The action needs an active encounter.
    #[error("you are not in combat")]
    NotInCombat,

    /// `start_combat` while a fight is still being played out.
    #[error("an encounter is already in progress")]
    EncounterInProgress,

    /// A deferred step (monster turn or settle) has not run yet.
    #[error("wait for the current turn to finish")]
    ActionPending,

    /// The potion bag is empty.
    #[error("you have no health potions left")]
    NoPotions,

    /// No skill with this id is known to the caster.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// The caster has not reached the skill's unlock level.
    #[error("{skill} unlocks at level {required_level}")]
    SkillLocked {
        /// The locked skill's display name.
        skill: String,
        /// Level needed to use it.
        required_level: u32,
    },

    /// The skill is still cooling down.
    #[error("{skill} is on cooldown ({remaining} turns)")]
    SkillOnCooldown {
        /// The skill's display name.
        skill: String,
        /// Turns until it is ready.
        remaining: u32,
    },

    /// Not enough mana to pay the cost.
    #[error("not enough mana for {skill} ({available}/{cost})")]
    InsufficientMana {
        /// The skill's display name.
        skill: String,
        /// Mana cost of the skill.
        cost: u32,
        /// Mana currently available.
        available: u32,
    },
}

/// Reasons an equipment change was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentError {
    #[error("nothing is equipped in that slot")]
    EmptySlot,

    #[error("item is already at max level")]
    MaxLevel,

    #[error("upgrade costs {cost} gold, you have {gold}")]
    InsufficientGold { cost: u64, gold: u64 },

    #[error("{0:?} cannot be equipped")]
    NotEquippable(ItemId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combat_error_messages() {
        assert_eq!(CombatError::NoPotions.to_string(), "you have no health potions left");
        let err = CombatError::SkillOnCooldown {
            skill: "Slash".to_string(),
            remaining: 2,
        };
        assert_eq!(err.to_string(), "Slash is on cooldown (2 turns)");
    }

    #[test]
    fn test_equipment_error_messages() {
        let err = EquipmentError::InsufficientGold { cost: 75, gold: 10 };
        assert_eq!(err.to_string(), "upgrade costs 75 gold, you have 10");
    }
}
