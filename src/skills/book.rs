//! Per-combatant skill instances.
//!
//! Every combatant owns its own `SkillBook`, cloned from the catalog at spawn
//! time, so cooldowns never bleed between two monsters of the same species.

use super::types::{EffectType, Skill, SkillEffect, SkillPower};
use crate::character::stats::StatBlock;
use crate::core::constants::{
    PLAYER_MAX_MANA, SKILL_UPGRADE_COST_GROWTH, SKILL_UPGRADE_POWER_GROWTH,
};
use crate::core::error::CombatError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Resource spent by skills that have a mana cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub current: u32,
    pub max: u32,
}

impl ManaPool {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deducts the cost. Returns false and leaves the pool alone when short.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    pub fn regenerate(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

impl Default for ManaPool {
    fn default() -> Self {
        Self::new(PLAYER_MAX_MANA)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBook {
    skills: Vec<Skill>,
}

impl SkillBook {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    pub fn push(&mut self, skill: Skill) {
        self.skills.push(skill);
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Checks whether a skill could be used right now, without committing.
    pub fn check(&self, id: &str, caster_level: u32, mana: Option<&ManaPool>) -> Result<&Skill, CombatError> {
        let skill = self
            .get(id)
            .ok_or_else(|| CombatError::UnknownSkill(id.to_string()))?;
        if caster_level < skill.unlock_level {
            return Err(CombatError::SkillLocked {
                skill: skill.name.clone(),
                required_level: skill.unlock_level,
            });
        }
        if !skill.is_ready() {
            return Err(CombatError::SkillOnCooldown {
                skill: skill.name.clone(),
                remaining: skill.current_cooldown,
            });
        }
        let available = mana.map_or(0, |m| m.current);
        if skill.mana_cost > available {
            return Err(CombatError::InsufficientMana {
                skill: skill.name.clone(),
                cost: skill.mana_cost,
                available,
            });
        }
        Ok(skill)
    }

    /// Uses a skill: verifies it, pays the mana, starts the cooldown and
    /// resolves the effect against the caster's effective stats.
    ///
    /// Nothing changes on failure.
    pub fn use_skill(
        &mut self,
        id: &str,
        caster: &StatBlock,
        mana: Option<&mut ManaPool>,
    ) -> Result<SkillEffect, CombatError> {
        let cost = self.check(id, caster.level, mana.as_deref())?.mana_cost;
        if let Some(pool) = mana {
            pool.spend(cost);
        }
        let skill = self
            .skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CombatError::UnknownSkill(id.to_string()))?;
        skill.start_cooldown();
        Ok(skill.resolve(caster))
    }

    /// Picks uniformly among skills with no cooldown, commits the cooldown
    /// and resolves it. None when nothing is ready.
    pub fn use_random_ready(&mut self, caster: &StatBlock, rng: &mut impl Rng) -> Option<SkillEffect> {
        let ready: Vec<usize> = self
            .skills
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_ready())
            .map(|(i, _)| i)
            .collect();
        if ready.is_empty() {
            return None;
        }
        let skill = &mut self.skills[ready[rng.gen_range(0..ready.len())]];
        skill.start_cooldown();
        Some(skill.resolve(caster))
    }

    /// One owner turn has passed.
    pub fn tick_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.tick_cooldown();
        }
    }

    pub fn reset_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.current_cooldown = 0;
        }
    }

    /// Levels a skill up. Returns false for unknown ids.
    pub fn upgrade(&mut self, id: &str) -> bool {
        match self.skills.iter_mut().find(|s| s.id == id) {
            Some(skill) => {
                skill.upgrade(SKILL_UPGRADE_POWER_GROWTH, SKILL_UPGRADE_COST_GROWTH);
                true
            }
            None => false,
        }
    }
}

/// Fresh copy of the player's skill list.
pub fn player_skill_book() -> SkillBook {
    SkillBook::new(vec![
        Skill::new("slash", "斩击", EffectType::Damage, SkillPower::Ratio(1.2), 3)
            .with_mana_cost(20),
        Skill::new("heal", "治疗术", EffectType::Heal, SkillPower::Ratio(0.3), 5)
            .with_mana_cost(30)
            .with_unlock_level(3),
        Skill::new("fireball", "火球术", EffectType::Damage, SkillPower::Ratio(1.5), 4)
            .with_mana_cost(40)
            .with_unlock_level(5),
        Skill::new("rage", "狂暴", EffectType::Buff, SkillPower::Ratio(0.3), 6)
            .with_mana_cost(50)
            .with_unlock_level(7)
            .with_duration(3),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn caster(level: u32) -> StatBlock {
        StatBlock::new(level, 100, 20, 10, 10)
    }

    #[test]
    fn test_use_skill_commits_cooldown_and_mana() {
        let mut book = player_skill_book();
        let mut mana = ManaPool::new(100);
        let effect = book.use_skill("slash", &caster(1), Some(&mut mana)).unwrap();
        assert_eq!(effect.magnitude, 24);
        assert_eq!(effect.effect, EffectType::Damage);
        assert_eq!(mana.current, 80);
        assert_eq!(book.get("slash").unwrap().current_cooldown, 3);
    }

    #[test]
    fn test_on_cooldown_is_refused_without_side_effects() {
        let mut book = player_skill_book();
        let mut mana = ManaPool::new(100);
        book.use_skill("slash", &caster(1), Some(&mut mana)).unwrap();
        let err = book.use_skill("slash", &caster(1), Some(&mut mana)).unwrap_err();
        assert_eq!(
            err,
            CombatError::SkillOnCooldown {
                skill: "斩击".to_string(),
                remaining: 3
            }
        );
        assert_eq!(mana.current, 80);
    }

    #[test]
    fn test_insufficient_mana() {
        let mut book = player_skill_book();
        let mut mana = ManaPool { current: 10, max: 100 };
        let err = book.use_skill("slash", &caster(1), Some(&mut mana)).unwrap_err();
        assert!(matches!(err, CombatError::InsufficientMana { cost: 20, available: 10, .. }));
        assert!(book.get("slash").unwrap().is_ready());
        assert_eq!(mana.current, 10);
    }

    #[test]
    fn test_locked_skill() {
        let mut book = player_skill_book();
        let mut mana = ManaPool::new(100);
        let err = book.use_skill("fireball", &caster(4), Some(&mut mana)).unwrap_err();
        assert!(matches!(err, CombatError::SkillLocked { required_level: 5, .. }));
        assert!(book.use_skill("fireball", &caster(5), Some(&mut mana)).is_ok());
    }

    #[test]
    fn test_unknown_skill() {
        let mut book = player_skill_book();
        let err = book.use_skill("assist_attack", &caster(1), None).unwrap_err();
        assert_eq!(err, CombatError::UnknownSkill("assist_attack".to_string()));
    }

    #[test]
    fn test_costed_skill_without_pool_is_refused() {
        let mut book = player_skill_book();
        assert!(book.use_skill("slash", &caster(1), None).is_err());
    }

    #[test]
    fn test_ready_again_after_cooldown_turns() {
        let mut book = player_skill_book();
        let mut mana = ManaPool::new(1000);
        book.use_skill("slash", &caster(1), Some(&mut mana)).unwrap();
        book.tick_cooldowns();
        book.tick_cooldowns();
        assert!(book.check("slash", 1, Some(&mana)).is_err());
        book.tick_cooldowns();
        assert!(book.check("slash", 1, Some(&mana)).is_ok());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = player_skill_book();
        let b = player_skill_book();
        let mut mana = ManaPool::new(100);
        a.use_skill("slash", &caster(1), Some(&mut mana)).unwrap();
        assert!(b.get("slash").unwrap().is_ready());
    }

    #[test]
    fn test_random_ready_only_picks_ready_skills() {
        let mut book = SkillBook::new(vec![
            Skill::new("a", "A", EffectType::Damage, SkillPower::Ratio(1.0), 2),
            Skill::new("b", "B", EffectType::Damage, SkillPower::Ratio(1.0), 2),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let first = book.use_random_ready(&caster(1), &mut rng).unwrap();
        let second = book.use_random_ready(&caster(1), &mut rng).unwrap();
        assert_ne!(first.skill_id, second.skill_id);
        assert!(book.use_random_ready(&caster(1), &mut rng).is_none());
    }

    #[test]
    fn test_random_ready_is_roughly_uniform() {
        let template = SkillBook::new(vec![
            Skill::new("a", "A", EffectType::Damage, SkillPower::Ratio(1.0), 1),
            Skill::new("b", "B", EffectType::Damage, SkillPower::Ratio(1.0), 1),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut a_count = 0;
        for _ in 0..2000 {
            let mut book = template.clone();
            if book.use_random_ready(&caster(1), &mut rng).unwrap().skill_id == "a" {
                a_count += 1;
            }
        }
        assert!((900..1100).contains(&a_count), "a picked {a_count} times");
    }

    #[test]
    fn test_mana_pool() {
        let mut mana = ManaPool::new(100);
        assert!(mana.spend(60));
        assert!(!mana.spend(60));
        mana.regenerate(500);
        assert_eq!(mana.current, 100);
    }

    #[test]
    fn test_upgrade() {
        let mut book = player_skill_book();
        assert!(book.upgrade("slash"));
        assert_eq!(book.get("slash").unwrap().mana_cost, 22);
        assert!(!book.upgrade("nope"));
    }
}
