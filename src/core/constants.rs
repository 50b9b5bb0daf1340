// Presentation pacing (milliseconds)
pub const ACTION_DISPLAY_MS: u64 = 500;
pub const ENCOUNTER_START_DISPLAY_MS: u64 = 1000;
pub const MONSTER_TURN_DELAY_MS: u64 = 1000;
pub const SETTLE_DELAY_MS: u64 = 2000;
pub const COMBAT_LOG_CAPACITY: usize = 10;

// Combat
pub const MIN_DAMAGE: u32 = 1;
pub const FLEE_FAIL_THRESHOLD: f64 = 0.3;
pub const POTION_HEAL_AMOUNT: u32 = 50;
pub const PET_LOYALTY_THRESHOLD: u32 = 30;
pub const PET_EXP_SHARE: f64 = 0.5;
pub const DEBUFF_DURATION_TURNS: u32 = 2;

// Loot
pub const DROP_CHECK_CHANCE: f64 = 0.3;

// Progression
pub const STARTING_NEXT_LEVEL_EXP: u64 = 100;
pub const NEXT_LEVEL_EXP_GROWTH: f64 = 1.5;

// Player
pub const PLAYER_BASE_HP: u32 = 100;
pub const PLAYER_BASE_ATTACK: u32 = 15;
pub const PLAYER_BASE_DEFENSE: u32 = 10;
pub const PLAYER_BASE_SPEED: u32 = 10;
pub const PLAYER_STARTING_GOLD: u64 = 100;
pub const PLAYER_STARTING_POTIONS: u32 = 3;
pub const PLAYER_MAX_MANA: u32 = 100;
pub const PLAYER_HP_PER_LEVEL: u32 = 20;
pub const PLAYER_ATTACK_PER_LEVEL: u32 = 5;
pub const PLAYER_DEFENSE_PER_LEVEL: u32 = 3;

// Pet
pub const PET_HP_PER_LEVEL: u32 = 10;
pub const PET_ATTACK_PER_LEVEL: u32 = 3;
pub const PET_DEFENSE_PER_LEVEL: u32 = 2;
pub const PET_LOYALTY_PER_LEVEL: u32 = 5;
pub const PET_MAX_LOYALTY: u32 = 100;
pub const PET_STARTING_LOYALTY: u32 = 50;

// Monster base formulas: base + step * level, before the tier multiplier
pub const MONSTER_HP_BASE: u32 = 50;
pub const MONSTER_HP_PER_LEVEL: u32 = 20;
pub const MONSTER_ATTACK_BASE: u32 = 10;
pub const MONSTER_ATTACK_PER_LEVEL: u32 = 5;
pub const MONSTER_DEFENSE_BASE: u32 = 5;
pub const MONSTER_DEFENSE_PER_LEVEL: u32 = 2;
pub const MONSTER_SPEED_BASE: u32 = 10;
pub const MONSTER_SPEED_PER_LEVEL: u32 = 1;
pub const MONSTER_EXP_BASE: u32 = 20;
pub const MONSTER_EXP_PER_LEVEL: u32 = 10;
pub const MONSTER_GOLD_BASE: u32 = 10;
pub const MONSTER_GOLD_PER_LEVEL: u32 = 5;

// Tier multipliers
pub const NORMAL_TIER_MULTIPLIER: f64 = 1.0;
pub const ELITE_TIER_MULTIPLIER: f64 = 1.5;
pub const BOSS_TIER_MULTIPLIER: f64 = 3.0;

// Tier skills
pub const TIER_HEAL_PERCENT_OF_MAX_HP: f64 = 0.2;
pub const TIER_HEAL_COOLDOWN: u32 = 5;
pub const BOSS_RAGE_RATIO: f64 = 2.0;
pub const BOSS_RAGE_COOLDOWN: u32 = 6;

// Equipment
pub const EQUIPMENT_UPGRADE_COST_GROWTH: f64 = 1.5;
pub const EQUIPMENT_UPGRADE_STAT_GROWTH: f64 = 1.2;
pub const STARTER_GEAR_MAX_LEVEL: u32 = 10;
pub const STARTER_GEAR_UPGRADE_COST: u32 = 50;

// Skills
pub const SKILL_UPGRADE_POWER_GROWTH: f64 = 1.2;
pub const SKILL_UPGRADE_COST_GROWTH: f64 = 1.1;

// Inventory
pub const INVENTORY_MAX_SLOTS: usize = 20;
