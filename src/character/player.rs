//! The player character: base stats, gear, bag, skills, mana and an optional pet.

use super::buffs::{Buff, BuffSet};
use super::pet::Pet;
use super::progression::{ProgressionState, PLAYER_LEVEL_UP_GAINS};
use super::stats::StatBlock;
use crate::combat::types::{Combatant, CombatantKind};
use crate::core::combat_math::{apply_damage, apply_heal, scale_floor};
use crate::core::constants::*;
use crate::core::error::{CombatError, EquipmentError};
use crate::items::{Equipment, EquipmentSlot, GearPiece, Inventory, ItemId};
use crate::skills::{player_skill_book, ManaPool, SkillBook, SkillEffect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Player state that persists across encounters.
///
/// `base` is the ungeared stat block and always sits at full health. Live HP
/// is kept in `hp`, capped at the effective max HP (base plus gear).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    base: StatBlock,
    hp: u32,
    progression: ProgressionState,
    pub gold: u64,
    pub health_potions: u32,
    mana: ManaPool,
    equipment: Equipment,
    pub inventory: Inventory,
    skills: SkillBook,
    buffs: BuffSet,
    pet: Option<Pet>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: StatBlock::new(
                1,
                PLAYER_BASE_HP,
                PLAYER_BASE_ATTACK,
                PLAYER_BASE_DEFENSE,
                PLAYER_BASE_SPEED,
            ),
            hp: PLAYER_BASE_HP,
            progression: ProgressionState::new(),
            gold: PLAYER_STARTING_GOLD,
            health_potions: PLAYER_STARTING_POTIONS,
            mana: ManaPool::new(PLAYER_MAX_MANA),
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            skills: player_skill_book(),
            buffs: BuffSet::new(),
            pet: None,
        }
    }

    /// New player wearing the starter sword and cloth armor, at full HP.
    pub fn with_starter_gear(name: impl Into<String>) -> Self {
        let mut player = Self::new(name);
        player.equipment = Equipment::starter();
        player.hp = player.effective_max_hp();
        player
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    /// Stats before gear and buffs.
    pub fn base_stats(&self) -> StatBlock {
        self.base
    }

    pub fn effective_max_hp(&self) -> u32 {
        self.base.max_hp.saturating_add(self.equipment.totals().health)
    }

    /// (base + gear attack) scaled by every active buff, floored.
    pub fn effective_attack(&self) -> u32 {
        let raw = self.base.attack.saturating_add(self.equipment.totals().attack);
        scale_floor(raw, self.buffs.attack_multiplier())
    }

    /// Defense is never buff-scaled.
    pub fn effective_defense(&self) -> u32 {
        self.base.defense.saturating_add(self.equipment.totals().defense)
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn buffs(&self) -> &BuffSet {
        &self.buffs
    }

    pub fn add_buff(&mut self, buff: Buff) {
        self.buffs.add(buff);
    }

    pub fn mana(&self) -> ManaPool {
        self.mana
    }

    pub fn regenerate_mana(&mut self, amount: u32) {
        self.mana.regenerate(amount);
    }

    pub fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    pub fn pet_mut(&mut self) -> Option<&mut Pet> {
        self.pet.as_mut()
    }

    /// Adopts a pet, returning the one it replaces.
    pub fn adopt_pet(&mut self, pet: Pet) -> Option<Pet> {
        self.pet.replace(pet)
    }

    /// Drinks one health potion. Returns the HP actually restored.
    pub fn use_health_potion(&mut self, heal_amount: u32) -> Result<u32, CombatError> {
        if self.health_potions == 0 {
            return Err(CombatError::NoPotions);
        }
        self.health_potions -= 1;
        Ok(self.heal(heal_amount))
    }

    /// Adds experience. Each level-up grants fixed stats and a full heal.
    /// Returns the number of levels gained.
    pub fn gain_exp(&mut self, amount: u64) -> u32 {
        let levels = self.progression.gain_exp(amount);
        if levels == 0 {
            return 0;
        }
        let gains = PLAYER_LEVEL_UP_GAINS;
        for _ in 0..levels {
            self.base.max_hp = self.base.max_hp.saturating_add(gains.max_hp);
            self.base.attack = self.base.attack.saturating_add(gains.attack);
            self.base.defense = self.base.defense.saturating_add(gains.defense);
        }
        self.base.level = self.progression.level;
        self.base.restore_full();
        self.hp = self.effective_max_hp();
        info!(player = %self.name, level = self.base.level, "player leveled up");
        levels
    }

    pub fn gain_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Returns false and keeps the gold when the purse is short.
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Stores dropped items. Health potions go to the potion count, the rest
    /// into the bag. Returns the items that did not fit.
    pub fn collect_loot(&mut self, items: &[ItemId]) -> Vec<ItemId> {
        let mut discarded = Vec::new();
        for &item in items {
            if item == ItemId::HealthPotion {
                self.health_potions = self.health_potions.saturating_add(1);
            } else if !self.inventory.add(item) {
                debug!(?item, "inventory full, item discarded");
                discarded.push(item);
            }
        }
        discarded
    }

    /// Equips a catalog item, returning the piece it displaced.
    pub fn equip(&mut self, item: ItemId) -> Result<Option<GearPiece>, EquipmentError> {
        let piece = GearPiece::from_item(item).ok_or(EquipmentError::NotEquippable(item))?;
        let previous = self.equipment.equip(piece);
        self.clamp_hp();
        Ok(previous)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<GearPiece> {
        let removed = self.equipment.unequip(slot);
        self.clamp_hp();
        removed
    }

    /// Pays for and applies one upgrade level. Returns the gold spent.
    pub fn upgrade_equipment(&mut self, slot: EquipmentSlot) -> Result<u64, EquipmentError> {
        let gold = self.gold;
        let piece = self.equipment.get_mut(slot).ok_or(EquipmentError::EmptySlot)?;
        if piece.is_max_level() {
            return Err(EquipmentError::MaxLevel);
        }
        let cost = piece.next_upgrade_cost();
        if gold < cost {
            return Err(EquipmentError::InsufficientGold { cost, gold });
        }
        piece.apply_upgrade();
        self.gold -= cost;
        Ok(cost)
    }

    pub fn upgrade_skill(&mut self, id: &str) -> bool {
        self.skills.upgrade(id)
    }

    /// Full heal, full mana, no buffs and no cooldowns.
    pub fn rest(&mut self) {
        self.hp = self.effective_max_hp();
        self.mana.refill();
        self.buffs.clear();
        self.skills.reset_cooldowns();
    }

    fn clamp_hp(&mut self) {
        self.hp = self.hp.min(self.effective_max_hp());
    }
}

impl Combatant for Player {
    fn kind(&self) -> CombatantKind {
        CombatantKind::Player
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> StatBlock {
        StatBlock {
            level: self.base.level,
            max_hp: self.effective_max_hp(),
            current_hp: self.hp,
            attack: self.effective_attack(),
            defense: self.effective_defense(),
            speed: self.base.speed,
        }
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = apply_damage(self.hp, amount);
        before - self.hp
    }

    fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = apply_heal(self.hp, amount, self.effective_max_hp()).max(before);
        self.hp - before
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

    /// Player skills also check the unlock level and pay mana.
    fn use_skill(&mut self, id: &str) -> Result<SkillEffect, CombatError> {
        let stats = self.stats();
        self.skills.use_skill(id, &stats, Some(&mut self.mana))
    }
}
