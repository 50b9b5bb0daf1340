use super::types::ItemId;
use crate::core::constants::INVENTORY_MAX_SLOTS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stacked item bag with a limit on distinct stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    stacks: BTreeMap<ItemId, u32>,
    max_slots: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_capacity(INVENTORY_MAX_SLOTS)
    }

    pub fn with_capacity(max_slots: usize) -> Self {
        Self {
            stacks: BTreeMap::new(),
            max_slots,
        }
    }

    /// Adds one item. Returns false when it would need a new stack and the
    /// bag is full.
    pub fn add(&mut self, item: ItemId) -> bool {
        if let Some(count) = self.stacks.get_mut(&item) {
            *count = count.saturating_add(1);
            return true;
        }
        if self.stacks.len() >= self.max_slots {
            return false;
        }
        self.stacks.insert(item, 1);
        true
    }

    pub fn count(&self, item: ItemId) -> u32 {
        self.stacks.get(&item).copied().unwrap_or(0)
    }

    pub fn slots_used(&self) -> usize {
        self.stacks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.stacks.iter().map(|(item, count)| (*item, *count))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
