//! Companion that follows the player into encounters and assists on attack turns.

use super::buffs::BuffSet;
use super::progression::{ProgressionState, PET_LEVEL_UP_GAINS};
use super::stats::StatBlock;
use crate::combat::types::{Combatant, CombatantKind};
use crate::core::combat_math::assist_damage;
use crate::core::constants::{PET_MAX_LOYALTY, PET_STARTING_LOYALTY};
use crate::skills::{EffectType, Skill, SkillBook, SkillEffect, SkillPower};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetKind {
    Dog,
}

impl PetKind {
    pub fn name(&self) -> &'static str {
        match self {
            PetKind::Dog => "小狗",
        }
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            PetKind::Dog => "🐕",
        }
    }

    /// (max_hp, attack, defense) at level 1.
    pub fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            PetKind::Dog => (80, 12, 8),
        }
    }

    /// Fresh skill instances for a new pet of this kind. The first damage
    /// skill is the assist.
    pub fn skill_book(&self) -> SkillBook {
        match self {
            PetKind::Dog => SkillBook::new(vec![
                Skill::new("bite", "撕咬", EffectType::Damage, SkillPower::Ratio(0.5), 3),
                Skill::new("howl", "嚎叫", EffectType::Buff, SkillPower::Ratio(0.2), 5)
                    .with_duration(3),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub kind: PetKind,
    stats: StatBlock,
    progression: ProgressionState,
    loyalty: u32,
    skills: SkillBook,
    buffs: BuffSet,
}

impl Pet {
    pub fn new(name: impl Into<String>, kind: PetKind) -> Self {
        let (max_hp, attack, defense) = kind.base_stats();
        Self {
            name: name.into(),
            kind,
            stats: StatBlock::new(1, max_hp, attack, defense, 0),
            progression: ProgressionState::new(),
            loyalty: PET_STARTING_LOYALTY,
            skills: kind.skill_book(),
            buffs: BuffSet::new(),
        }
    }

    pub fn loyalty(&self) -> u32 {
        self.loyalty
    }

    pub fn set_loyalty(&mut self, loyalty: u32) {
        self.loyalty = loyalty.min(PET_MAX_LOYALTY);
    }

    pub fn is_loyal_enough(&self, threshold: u32) -> bool {
        self.loyalty >= threshold
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    /// Adds experience and applies every level-up it triggers. Each level
    /// grants fixed stats, loyalty, and a full heal.
    pub fn gain_exp(&mut self, amount: u64) -> u32 {
        let levels = self.progression.gain_exp(amount);
        for _ in 0..levels {
            let gains = PET_LEVEL_UP_GAINS;
            self.stats.max_hp = self.stats.max_hp.saturating_add(gains.max_hp);
            self.stats.attack = self.stats.attack.saturating_add(gains.attack);
            self.stats.defense = self.stats.defense.saturating_add(gains.defense);
            self.loyalty = (self.loyalty + gains.loyalty).min(PET_MAX_LOYALTY);
        }
        if levels > 0 {
            self.stats.level = self.progression.level;
            self.stats.restore_full();
            info!(pet = %self.name, level = self.stats.level, "pet leveled up");
        }
        levels
    }

    /// Uses the first ready skill on an attack turn. Damage skills scale off
    /// the damage the player just dealt, floored at 1; anything else resolves
    /// against the pet's own stats.
    pub fn assist(&mut self, player_damage: u32) -> Option<SkillEffect> {
        let skill = self.skills.iter().find(|s| s.is_ready())?;
        let id = skill.id.clone();
        let power = skill.power;
        let stats = self.stats;
        let mut effect = self.skills.use_skill(&id, &stats, None).ok()?;
        if effect.effect == EffectType::Damage {
            effect.magnitude = match power {
                SkillPower::Ratio(ratio) => assist_damage(player_damage, ratio),
                SkillPower::Flat(amount) => amount.max(1),
            };
        }
        Some(effect)
    }
}

impl Combatant for Pet {
    fn kind(&self) -> CombatantKind {
        CombatantKind::Pet
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> StatBlock {
        self.stats
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.stats.take_damage(amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.stats.heal(amount)
    }

    fn skills(&self) -> &SkillBook {
        &self.skills
    }

    fn skills_mut(&mut self) -> &mut SkillBook {
        &mut self.skills
    }

    fn buffs_mut(&mut self) -> &mut BuffSet {
        &mut self.buffs
    }
}
