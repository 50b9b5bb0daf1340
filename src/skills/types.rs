use crate::character::buffs::Buff;
use crate::character::stats::StatBlock;
use crate::core::combat_math::scale_floor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    Damage,
    Heal,
    Buff,
    Debuff,
}

/// How a skill's strength is expressed.
///
/// Ratios scale off the caster: attack for damage, max HP for heals, and
/// for buffs/debuffs the ratio becomes the attack multiplier (a buff of 0.3
/// is x1.3, a debuff of 0.8 is x0.8).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillPower {
    Ratio(f64),
    Flat(u32),
}

impl SkillPower {
    fn grow(self, factor: f64) -> Self {
        match self {
            SkillPower::Ratio(r) => SkillPower::Ratio(r * factor),
            SkillPower::Flat(n) => SkillPower::Flat(scale_floor(n, factor)),
        }
    }
}

/// A skill instance with its own cooldown state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub effect: EffectType,
    pub power: SkillPower,
    pub cooldown_turns: u32,
    pub current_cooldown: u32,
    pub mana_cost: u32,
    pub unlock_level: u32,
    /// Turns a buff or debuff lasts. Ignored for damage and heal skills.
    pub duration_turns: u32,
    pub level: u32,
}

impl Skill {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        effect: EffectType,
        power: SkillPower,
        cooldown_turns: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effect,
            power,
            cooldown_turns,
            current_cooldown: 0,
            mana_cost: 0,
            unlock_level: 1,
            duration_turns: 0,
            level: 1,
        }
    }

    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_unlock_level(mut self, level: u32) -> Self {
        self.unlock_level = level;
        self
    }

    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration_turns = turns;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Puts the skill on its full cooldown.
    pub fn start_cooldown(&mut self) {
        self.current_cooldown = self.cooldown_turns;
    }

    /// One owner turn has passed.
    pub fn tick_cooldown(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }

    /// Level the skill up: power x1.2, mana cost x1.1 (floored).
    pub fn upgrade(&mut self, power_growth: f64, cost_growth: f64) {
        self.level += 1;
        self.power = self.power.grow(power_growth);
        self.mana_cost = scale_floor(self.mana_cost, cost_growth);
    }

    /// Resolves the skill against the caster's effective stats without
    /// touching any state.
    pub fn resolve(&self, caster: &StatBlock) -> SkillEffect {
        let (magnitude, buff) = match (self.effect, self.power) {
            (EffectType::Damage, SkillPower::Ratio(r)) => (scale_floor(caster.attack, r), None),
            (EffectType::Heal, SkillPower::Ratio(r)) => (scale_floor(caster.max_hp, r), None),
            (EffectType::Damage | EffectType::Heal, SkillPower::Flat(n)) => (n, None),
            (EffectType::Buff, power) => {
                let multiplier = match power {
                    SkillPower::Ratio(r) => 1.0 + r,
                    SkillPower::Flat(n) => 1.0 + n as f64 / 100.0,
                };
                let buff = Buff::new(self.name.clone(), multiplier, self.duration_turns);
                (percent_change(multiplier), Some(buff))
            }
            (EffectType::Debuff, power) => {
                let multiplier = match power {
                    SkillPower::Ratio(r) => r,
                    SkillPower::Flat(n) => n as f64 / 100.0,
                };
                let buff = Buff::new(self.name.clone(), multiplier, self.duration_turns);
                (percent_change(multiplier), Some(buff))
            }
        };
        SkillEffect {
            skill_id: self.id.clone(),
            name: self.name.clone(),
            effect: self.effect,
            magnitude,
            buff,
        }
    }
}

fn percent_change(multiplier: f64) -> u32 {
    ((multiplier - 1.0).abs() * 100.0).round() as u32
}

/// What a skill use produced. For buffs and debuffs `magnitude` is the
/// percentage change to attack and `buff` carries the timed modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub skill_id: String,
    pub name: String,
    pub effect: EffectType,
    pub magnitude: u32,
    pub buff: Option<Buff>,
}

impl SkillEffect {
    /// Plain attack with no skill behind it.
    pub fn basic_attack(name: impl Into<String>, attack: u32) -> Self {
        Self {
            skill_id: String::new(),
            name: name.into(),
            effect: EffectType::Damage,
            magnitude: attack,
            buff: None,
        }
    }
}
