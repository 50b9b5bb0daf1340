use serde::{Deserialize, Serialize};

/// A timed multiplier on attack. Multipliers below 1.0 are debuffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    pub multiplier: f64,
    pub remaining_turns: u32,
}

impl Buff {
    pub fn new(name: impl Into<String>, multiplier: f64, remaining_turns: u32) -> Self {
        Self {
            name: name.into(),
            multiplier,
            remaining_turns,
        }
    }

    pub fn is_debuff(&self) -> bool {
        self.multiplier < 1.0
    }
}

/// Active buffs on one combatant, at most one per name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffSet {
    buffs: Vec<Buff>,
}

impl BuffSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a buff, replacing any active buff with the same name.
    /// Zero-duration buffs are ignored.
    pub fn add(&mut self, buff: Buff) {
        if buff.remaining_turns == 0 {
            return;
        }
        match self.buffs.iter_mut().find(|b| b.name == buff.name) {
            Some(existing) => *existing = buff,
            None => self.buffs.push(buff),
        }
    }

    /// Product of every active multiplier (1.0 when empty).
    pub fn attack_multiplier(&self) -> f64 {
        self.buffs.iter().map(|b| b.multiplier).product()
    }

    /// One owner turn has passed: decrement and drop expired buffs.
    pub fn tick(&mut self) {
        for buff in &mut self.buffs {
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
        }
        self.buffs.retain(|b| b.remaining_turns > 0);
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}
