use super::types::{ItemId, ItemKind};
use crate::core::combat_math::scale_floor;
use crate::core::constants::{
    EQUIPMENT_UPGRADE_COST_GROWTH, EQUIPMENT_UPGRADE_STAT_GROWTH, STARTER_GEAR_MAX_LEVEL,
    STARTER_GEAR_UPGRADE_COST,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 3] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Armor,
        EquipmentSlot::Accessory,
    ];

    /// Slot an item of this kind goes into, if any.
    pub fn for_kind(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Weapon => Some(EquipmentSlot::Weapon),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Accessory => Some(EquipmentSlot::Accessory),
            ItemKind::Potion | ItemKind::Material => None,
        }
    }
}

/// A worn piece of gear with its own upgrade level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearPiece {
    pub name: String,
    pub slot: EquipmentSlot,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub level: u32,
    pub max_level: u32,
    pub upgrade_cost: u32,
}

impl GearPiece {
    /// Builds a level-1 piece from a catalog item. Returns None for items
    /// that have no slot.
    pub fn from_item(id: ItemId) -> Option<Self> {
        let def = id.def();
        let slot = EquipmentSlot::for_kind(def.kind)?;
        Some(Self {
            name: def.name.to_string(),
            slot,
            attack: def.attack,
            defense: def.defense,
            health: def.health,
            level: 1,
            max_level: STARTER_GEAR_MAX_LEVEL,
            upgrade_cost: def.price,
        })
    }

    pub fn starter_sword() -> Self {
        Self {
            name: "新手剑".to_string(),
            slot: EquipmentSlot::Weapon,
            attack: 5,
            defense: 0,
            health: 0,
            level: 1,
            max_level: STARTER_GEAR_MAX_LEVEL,
            upgrade_cost: STARTER_GEAR_UPGRADE_COST,
        }
    }

    pub fn starter_armor() -> Self {
        Self {
            name: "新手布甲".to_string(),
            slot: EquipmentSlot::Armor,
            attack: 0,
            defense: 3,
            health: 20,
            level: 1,
            max_level: STARTER_GEAR_MAX_LEVEL,
            upgrade_cost: STARTER_GEAR_UPGRADE_COST,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }

    /// Gold needed for the next level: floor(upgrade_cost * 1.5^level).
    pub fn next_upgrade_cost(&self) -> u64 {
        let cost = self.upgrade_cost as f64 * EQUIPMENT_UPGRADE_COST_GROWTH.powi(self.level as i32);
        cost.floor() as u64
    }

    /// Raises the level by one and grows each bonus by 20%, floored.
    /// Does nothing at max level.
    pub fn apply_upgrade(&mut self) {
        if self.is_max_level() {
            return;
        }
        self.level += 1;
        self.attack = scale_floor(self.attack, EQUIPMENT_UPGRADE_STAT_GROWTH);
        self.defense = scale_floor(self.defense, EQUIPMENT_UPGRADE_STAT_GROWTH);
        self.health = scale_floor(self.health, EQUIPMENT_UPGRADE_STAT_GROWTH);
    }
}

/// Summed bonuses of everything worn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentTotals {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
}

/// Player equipment slots. One piece per slot at most.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<GearPiece>,
    pub armor: Option<GearPiece>,
    #[serde(default)]
    pub accessory: Option<GearPiece>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            weapon: None,
            armor: None,
            accessory: None,
        }
    }

    pub fn starter() -> Self {
        Self {
            weapon: Some(GearPiece::starter_sword()),
            armor: Some(GearPiece::starter_armor()),
            accessory: None,
        }
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<GearPiece> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Accessory => &self.accessory,
        }
    }

    pub fn get_mut(&mut self, slot: EquipmentSlot) -> Option<&mut GearPiece> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_mut(),
            EquipmentSlot::Armor => self.armor.as_mut(),
            EquipmentSlot::Accessory => self.accessory.as_mut(),
        }
    }

    /// Puts a piece in its slot and returns whatever was there before.
    pub fn equip(&mut self, piece: GearPiece) -> Option<GearPiece> {
        let slot = match piece.slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        };
        slot.replace(piece)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<GearPiece> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.take(),
            EquipmentSlot::Armor => self.armor.take(),
            EquipmentSlot::Accessory => self.accessory.take(),
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &GearPiece> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|piece| piece.as_ref())
    }

    pub fn totals(&self) -> EquipmentTotals {
        self.iter_equipped()
            .fold(EquipmentTotals::default(), |acc, piece| EquipmentTotals {
                attack: acc.attack.saturating_add(piece.attack),
                defense: acc.defense.saturating_add(piece.defense),
                health: acc.health.saturating_add(piece.health),
            })
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert_eq!(eq.iter_equipped().count(), 0);
        assert_eq!(eq.totals(), EquipmentTotals::default());
    }

    #[test]
    fn test_starter_totals() {
        let eq = Equipment::starter();
        assert_eq!(
            eq.totals(),
            EquipmentTotals {
                attack: 5,
                defense: 3,
                health: 20
            }
        );
    }

    #[test]
    fn test_equip_replaces_same_slot() {
        let mut eq = Equipment::starter();
        let iron = GearPiece::from_item(ItemId::IronSword).unwrap();
        let old = eq.equip(iron).unwrap();
        assert_eq!(old.name, "新手剑");
        assert_eq!(eq.iter_equipped().count(), 2);
        assert_eq!(eq.totals().attack, 12);
    }

    #[test]
    fn test_accessory_slot() {
        let mut eq = Equipment::new();
        assert!(eq.equip(GearPiece::from_item(ItemId::LuckyCharm).unwrap()).is_none());
        assert_eq!(eq.totals().defense, 5);
        assert!(eq.unequip(EquipmentSlot::Accessory).is_some());
        assert!(eq.get(EquipmentSlot::Accessory).is_none());
    }

    #[test]
    fn test_non_gear_items_have_no_slot() {
        assert!(GearPiece::from_item(ItemId::HealthPotion).is_none());
        assert!(GearPiece::from_item(ItemId::DragonScale).is_none());
    }

    #[test]
    fn test_upgrade_cost_grows() {
        let mut sword = GearPiece::starter_sword();
        assert_eq!(sword.next_upgrade_cost(), 75); // 50 * 1.5
        sword.apply_upgrade();
        assert_eq!(sword.next_upgrade_cost(), 112); // 50 * 2.25
    }

    #[test]
    fn test_upgrade_scales_stats() {
        let mut armor = GearPiece::starter_armor();
        armor.apply_upgrade();
        assert_eq!(armor.level, 2);
        assert_eq!(armor.defense, 3); // floor(3.6)
        assert_eq!(armor.health, 24);
        assert_eq!(armor.attack, 0);
    }

    #[test]
    fn test_upgrade_stops_at_max_level() {
        let mut sword = GearPiece::starter_sword();
        for _ in 0..20 {
            sword.apply_upgrade();
        }
        assert_eq!(sword.level, sword.max_level);
        assert!(sword.level <= sword.max_level);
    }
}
