use serde::{Deserialize, Serialize};

use crate::character::buffs::BuffSet;
use crate::character::stats::StatBlock;
use crate::core::constants::COMBAT_LOG_CAPACITY;
use crate::core::error::CombatError;
use crate::items::ItemId;
use crate::skills::{SkillBook, SkillEffect};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    Player,
    Monster,
    Pet,
}

/// Capabilities the resolver needs from anything that fights.
pub trait Combatant {
    fn kind(&self) -> CombatantKind;

    fn name(&self) -> &str;

    /// Effective stats: gear and buffs already applied.
    fn stats(&self) -> StatBlock;

    /// Returns the HP actually lost.
    fn take_damage(&mut self, amount: u32) -> u32;

    /// Returns the HP actually restored.
    fn heal(&mut self, amount: u32) -> u32;

    fn is_dead(&self) -> bool {
        self.stats().current_hp == 0
    }

    fn skills(&self) -> &SkillBook;

    fn skills_mut(&mut self) -> &mut SkillBook;

    fn buffs_mut(&mut self) -> &mut BuffSet;

    fn use_skill(&mut self, id: &str) -> Result<SkillEffect, CombatError> {
        let stats = self.stats();
        self.skills_mut().use_skill(id, &stats, None)
    }

    /// One of this combatant's turns is over.
    fn end_turn(&mut self) {
        self.skills_mut().tick_cooldowns();
        self.buffs_mut().tick();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    EncounterStart,
    Damage,
    Heal,
    Skill,
    Buff,
    Debuff,
    Victory,
    Defeat,
    Flee,
    FleeFailed,
    LevelUp,
}

/// Something the presentation layer should show, with a suggested duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub kind: EventKind,
    pub source: CombatantKind,
    pub target: CombatantKind,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub display_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Payload granted on victory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub exp: u64,
    pub gold: u64,
    pub items: Vec<ItemId>,
    pub pet_exp: u64,
    pub levels_gained: u32,
    pub pet_levels_gained: u32,
}

/// Follow-up work queued by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledStep {
    MonsterTurn,
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    Idle,
    AwaitingPlayer,
    MonsterTurnPending,
    Settling(EncounterOutcome),
}

/// Everything one call produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub events: Vec<CombatEvent>,
    pub messages: Vec<String>,
    pub reward: Option<Reward>,
    pub outcome: Option<EncounterOutcome>,
    pub next_step: Option<ScheduledStep>,
    pub next_delay_ms: Option<u64>,
}

impl TurnReport {
    /// Sum of every `Damage` event aimed at `target`.
    pub fn damage_to(&self, target: CombatantKind) -> u32 {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Damage && e.target == target)
            .map(|e| e.value)
            .sum()
    }

    pub fn has_event(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// Suggested time to show every event, back to back.
    pub fn total_display_ms(&self) -> u64 {
        self.events.iter().map(|e| e.display_ms).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub message: String,
    pub is_player_action: bool,
}

/// Most recent combat messages, oldest dropped first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    entries: VecDeque<CombatLogEntry>,
    capacity: usize,
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::with_capacity(COMBAT_LOG_CAPACITY)
    }
}

impl CombatLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, message: String, is_player_action: bool) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(CombatLogEntry {
            message,
            is_player_action,
        });
    }

    pub fn latest(&self) -> Option<&CombatLogEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
