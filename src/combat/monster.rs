//! Monster factory: stats from level and tier, skills and loot from species.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::{Combatant, CombatantKind};
use crate::character::buffs::BuffSet;
use crate::character::stats::StatBlock;
use crate::core::combat_math::scale_floor;
use crate::core::constants::*;
use crate::items::{ItemId, LootEntry, LootTable};
use crate::skills::{EffectType, Skill, SkillBook, SkillEffect, SkillPower};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Slime,
    Goblin,
    Skeleton,
    Bat,
    /// Any name without a dedicated entry.
    Wild,
}

impl Species {
    pub fn from_name(name: &str) -> Self {
        match name {
            "史莱姆" => Species::Slime,
            "哥布林" => Species::Goblin,
            "骷髅" => Species::Skeleton,
            "蝙蝠" => Species::Bat,
            _ => Species::Wild,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Slime => "史莱姆",
            Species::Goblin => "哥布林",
            Species::Skeleton => "骷髅",
            Species::Bat => "蝙蝠",
            Species::Wild => "野怪",
        }
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            Species::Slime => "🟢",
            Species::Goblin => "👺",
            Species::Skeleton => "💀",
            Species::Bat => "🦇",
            Species::Wild => "👾",
        }
    }

    fn signature_skill(&self) -> Skill {
        match self {
            Species::Slime => Skill::new("split", "分裂", EffectType::Damage, SkillPower::Ratio(0.5), 3),
            Species::Goblin => Skill::new("ambush", "突袭", EffectType::Damage, SkillPower::Ratio(1.5), 4),
            Species::Skeleton => {
                Skill::new("bone_spear", "骨矛投掷", EffectType::Damage, SkillPower::Ratio(1.2), 3)
            }
            Species::Bat => Skill::new("sonic_wave", "音波攻击", EffectType::Debuff, SkillPower::Ratio(0.8), 2)
                .with_duration(DEBUFF_DURATION_TURNS),
            Species::Wild => Skill::new("strike", "基础攻击", EffectType::Damage, SkillPower::Ratio(1.0), 1),
        }
    }

    fn loot(&self) -> Vec<LootEntry> {
        match self {
            Species::Slime => vec![LootEntry::new(ItemId::MagicCrystal, 0.3)],
            Species::Goblin => vec![
                LootEntry::new(ItemId::WoodenSword, 0.4),
                LootEntry::new(ItemId::IronOre, 0.6),
            ],
            Species::Skeleton => vec![
                LootEntry::new(ItemId::IronSword, 0.3),
                LootEntry::new(ItemId::HealthPotion, 0.5),
            ],
            Species::Bat => vec![LootEntry::new(ItemId::MagicCrystal, 0.4)],
            Species::Wild => vec![LootEntry::new(ItemId::HealthPotion, 0.3)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Normal,
    Elite,
    Boss,
}

impl Tier {
    pub fn multiplier(&self) -> f64 {
        match self {
            Tier::Normal => NORMAL_TIER_MULTIPLIER,
            Tier::Elite => ELITE_TIER_MULTIPLIER,
            Tier::Boss => BOSS_TIER_MULTIPLIER,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Tier::Normal => "",
            Tier::Elite => "【精英】",
            Tier::Boss => "【Boss】",
        }
    }
}

/// Stat formula shared by every species: floor((base + per_level * level) * tier).
fn tier_scaled(base: u32, per_level: u32, level: u32, tier: Tier) -> u32 {
    let raw = base.saturating_add(per_level.saturating_mul(level));
    scale_floor(raw, tier.multiplier())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub species: Species,
    pub tier: Tier,
    base_name: String,
    display_name: String,
    stats: StatBlock,
    skills: SkillBook,
    buffs: BuffSet,
    loot: LootTable,
    pub exp_reward: u64,
    pub gold_reward: u64,
}

impl Monster {
    pub fn new(name: &str, level: u32, tier: Tier) -> Self {
        let species = Species::from_name(name);
        let stats = StatBlock::new(
            level,
            tier_scaled(MONSTER_HP_BASE, MONSTER_HP_PER_LEVEL, level, tier),
            tier_scaled(MONSTER_ATTACK_BASE, MONSTER_ATTACK_PER_LEVEL, level, tier),
            tier_scaled(MONSTER_DEFENSE_BASE, MONSTER_DEFENSE_PER_LEVEL, level, tier),
            tier_scaled(MONSTER_SPEED_BASE, MONSTER_SPEED_PER_LEVEL, level, tier),
        );

        let mut skills = SkillBook::new(vec![species.signature_skill()]);
        let mut loot = LootTable::new(species.loot());
        if matches!(tier, Tier::Elite | Tier::Boss) {
            let heal = scale_floor(stats.max_hp, TIER_HEAL_PERCENT_OF_MAX_HP);
            skills.push(Skill::new(
                "recover",
                "恢复",
                EffectType::Heal,
                SkillPower::Flat(heal),
                TIER_HEAL_COOLDOWN,
            ));
        }
        if tier == Tier::Boss {
            skills.push(Skill::new(
                "frenzy",
                "狂暴",
                EffectType::Damage,
                SkillPower::Ratio(BOSS_RAGE_RATIO),
                BOSS_RAGE_COOLDOWN,
            ));
            loot.push(LootEntry::new(ItemId::DragonScale, 0.5));
            loot.push(LootEntry::new(ItemId::LuckyCharm, 0.3));
        }

        Self {
            species,
            tier,
            base_name: name.to_string(),
            display_name: format!("{}{}", tier.prefix(), name),
            stats,
            skills,
            buffs: BuffSet::new(),
            loot,
            exp_reward: tier_scaled(MONSTER_EXP_BASE, MONSTER_EXP_PER_LEVEL, level, tier) as u64,
            gold_reward: tier_scaled(MONSTER_GOLD_BASE, MONSTER_GOLD_PER_LEVEL, level, tier) as u64,
        }
    }

    /// Name without the tier prefix.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn sprite(&self) -> &'static str {
        self.species.sprite()
    }

    pub fn loot_table(&self) -> &LootTable {
        &self.loot
    }

    /// Starts the monster's turn: cooldowns tick, then a ready skill is
    /// picked uniformly at random. With nothing ready it falls back to a plain
    /// attack at base attack.
    pub fn take_turn(&mut self, rng: &mut impl Rng) -> SkillEffect {
        self.skills.tick_cooldowns();
        let caster = self.stats();
        self.skills
            .use_random_ready(&caster, rng)
            .unwrap_or_else(|| SkillEffect::basic_attack("普通攻击", self.stats.attack))
    }
}

/// Builds a monster for a spawn trigger.
pub fn spawn_monster(name: &str, level: u32, tier: Tier) -> Monster {
    Monster::new(name, level, tier)
}

impl Combatant for Monster {
    fn kind(&self) -> CombatantKind {
        CombatantKind::Monster
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn stats(&self) -> StatBlock {
        StatBlock {
            attack: scale_floor(self.stats.attack, self.buffs.attack_multiplier()),
            ..self.stats
        }
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
