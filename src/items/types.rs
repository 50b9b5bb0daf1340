use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Rarity {
    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Accessory,
    Potion,
    Material,
}

/// Every item a monster can drop or a player can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    WoodenSword,
    IronSword,
    LeatherArmor,
    IronArmor,
    HealthPotion,
    ManaPotion,
    IronOre,
    MagicCrystal,
    LuckyCharm,
    DragonScale,
}

/// Static catalog entry for an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: &'static str,
    pub icon: &'static str,
    pub price: u32,
    pub kind: ItemKind,
    pub rarity: Rarity,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub mana: u32,
}

const fn def(
    id: ItemId,
    name: &'static str,
    icon: &'static str,
    price: u32,
    kind: ItemKind,
    rarity: Rarity,
) -> ItemDef {
    ItemDef {
        id,
        name,
        icon,
        price,
        kind,
        rarity,
        attack: 0,
        defense: 0,
        health: 0,
        mana: 0,
    }
}

const WOODEN_SWORD: ItemDef = ItemDef {
    attack: 5,
    ..def(ItemId::WoodenSword, "木剑", "🗡️", 50, ItemKind::Weapon, Rarity::Common)
};
const IRON_SWORD: ItemDef = ItemDef {
    attack: 12,
    ..def(ItemId::IronSword, "铁剑", "⚔️", 150, ItemKind::Weapon, Rarity::Uncommon)
};
const LEATHER_ARMOR: ItemDef = ItemDef {
    defense: 8,
    ..def(ItemId::LeatherArmor, "皮甲", "🛡️", 80, ItemKind::Armor, Rarity::Common)
};
const IRON_ARMOR: ItemDef = ItemDef {
    defense: 15,
    ..def(ItemId::IronArmor, "铁甲", "🛡️", 200, ItemKind::Armor, Rarity::Uncommon)
};
const HEALTH_POTION: ItemDef = ItemDef {
    health: 100,
    ..def(ItemId::HealthPotion, "生命药水", "🧪", 30, ItemKind::Potion, Rarity::Common)
};
const MANA_POTION: ItemDef = ItemDef {
    mana: 50,
    ..def(ItemId::ManaPotion, "魔法药水", "🧪", 40, ItemKind::Potion, Rarity::Common)
};
const IRON_ORE: ItemDef = def(ItemId::IronOre, "铁矿石", "⛏️", 20, ItemKind::Material, Rarity::Common);
const MAGIC_CRYSTAL: ItemDef =
    def(ItemId::MagicCrystal, "魔法水晶", "💎", 100, ItemKind::Material, Rarity::Rare);
const LUCKY_CHARM: ItemDef = ItemDef {
    defense: 5,
    ..def(ItemId::LuckyCharm, "幸运符咒", "🍀", 300, ItemKind::Accessory, Rarity::Rare)
};
const DRAGON_SCALE: ItemDef =
    def(ItemId::DragonScale, "龙鳞", "🐉", 1000, ItemKind::Material, Rarity::Epic);

impl ItemId {
    pub const ALL: [ItemId; 10] = [
        ItemId::WoodenSword,
        ItemId::IronSword,
        ItemId::LeatherArmor,
        ItemId::IronArmor,
        ItemId::HealthPotion,
        ItemId::ManaPotion,
        ItemId::IronOre,
        ItemId::MagicCrystal,
        ItemId::LuckyCharm,
        ItemId::DragonScale,
    ];

    pub fn def(self) -> &'static ItemDef {
        match self {
            ItemId::WoodenSword => &WOODEN_SWORD,
            ItemId::IronSword => &IRON_SWORD,
            ItemId::LeatherArmor => &LEATHER_ARMOR,
            ItemId::IronArmor => &IRON_ARMOR,
            ItemId::HealthPotion => &HEALTH_POTION,
            ItemId::ManaPotion => &MANA_POTION,
            ItemId::IronOre => &IRON_ORE,
            ItemId::MagicCrystal => &MAGIC_CRYSTAL,
            ItemId::LuckyCharm => &LUCKY_CHARM,
            ItemId::DragonScale => &DRAGON_SCALE,
        }
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn kind(self) -> ItemKind {
        self.def().kind
    }
}
