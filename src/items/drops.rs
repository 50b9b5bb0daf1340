use super::types::ItemId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One line of a monster's loot table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: ItemId,
    /// Independent chance in [0, 1].
    pub drop_chance: f64,
}

impl LootEntry {
    pub fn new(item: ItemId, drop_chance: f64) -> Self {
        Self {
            item,
            drop_chance: drop_chance.clamp(0.0, 1.0),
        }
    }
}

/// Ordered set of loot entries owned by a monster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn new(entries: Vec<LootEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: LootEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LootEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rolls the coarse drop check. Passing it lets the table be evaluated.
pub fn roll_drop_check(drop_check_chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < drop_check_chance
}

/// Evaluates every entry against its own chance, in table order.
pub fn roll_entries(table: &LootTable, rng: &mut impl Rng) -> Vec<ItemId> {
    table
        .entries()
        .iter()
        .filter(|entry| rng.gen::<f64>() < entry.drop_chance)
        .map(|entry| entry.item)
        .collect()
}

/// Drops for a defeated monster: one drop check gates the whole table, then
/// every entry rolls independently. Zero items is possible even after the
/// check passes.
pub fn resolve_drops(table: &LootTable, drop_check_chance: f64, rng: &mut impl Rng) -> Vec<ItemId> {
    if !roll_drop_check(drop_check_chance, rng) {
        return Vec::new();
    }
    roll_entries(table, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_entry_chance_is_clamped() {
        assert_eq!(LootEntry::new(ItemId::IronOre, 1.5).drop_chance, 1.0);
        assert_eq!(LootEntry::new(ItemId::IronOre, -0.5).drop_chance, 0.0);
    }

    #[test]
    fn test_failed_drop_check_drops_nothing() {
        let table = LootTable::new(vec![LootEntry::new(ItemId::IronOre, 1.0)]);
        let mut rng = create_test_rng();
        for _ in 0..100 {
            assert!(resolve_drops(&table, 0.0, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_certain_entries_all_drop_in_order() {
        let table = LootTable::new(vec![
            LootEntry::new(ItemId::DragonScale, 1.0),
            LootEntry::new(ItemId::LuckyCharm, 1.0),
        ]);
        let mut rng = create_test_rng();
        let drops = resolve_drops(&table, 1.0, &mut rng);
        assert_eq!(drops, vec![ItemId::DragonScale, ItemId::LuckyCharm]);
    }

    #[test]
    fn test_empty_table_drops_nothing() {
        let mut rng = create_test_rng();
        assert!(resolve_drops(&LootTable::default(), 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_passing_check_can_still_drop_nothing() {
        let table = LootTable::new(vec![LootEntry::new(ItemId::IronOre, 0.0)]);
        let mut rng = create_test_rng();
        assert!(resolve_drops(&table, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_drop_rates_converge() {
        // Effective rate per entry = 0.3 * drop_chance
        let table = LootTable::new(vec![
            LootEntry::new(ItemId::WoodenSword, 0.4),
            LootEntry::new(ItemId::IronOre, 0.6),
        ]);
        let mut rng = create_test_rng();
        let trials = 100_000;
        let mut swords = 0;
        let mut ores = 0;
        for _ in 0..trials {
            for item in resolve_drops(&table, 0.3, &mut rng) {
                match item {
                    ItemId::WoodenSword => swords += 1,
                    ItemId::IronOre => ores += 1,
                    other => panic!("unexpected drop {other:?}"),
                }
            }
        }
        let sword_rate = swords as f64 / trials as f64;
        let ore_rate = ores as f64 / trials as f64;
        assert!((sword_rate - 0.12).abs() < 0.01, "sword rate {sword_rate}");
        assert!((ore_rate - 0.18).abs() < 0.01, "ore rate {ore_rate}");
    }

    #[test]
    fn test_entries_are_independent() {
        // Conditioned on the check passing, both entries dropping together
        // should happen at p1 * p2.
        let table = LootTable::new(vec![
            LootEntry::new(ItemId::WoodenSword, 0.5),
            LootEntry::new(ItemId::IronOre, 0.5),
        ]);
        let mut rng = create_test_rng();
        let trials = 40_000;
        let both = (0..trials)
            .filter(|_| roll_entries(&table, &mut rng).len() == 2)
            .count();
        let rate = both as f64 / trials as f64;
        assert!((rate - 0.25).abs() < 0.015, "joint rate {rate}");
    }
}
