//! Simulation configuration.

use crate::core::config::CombatConfig;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Encounters fought by one player per run
    pub encounters_per_run: u32,

    /// Player turns before an encounter is abandoned as a stalemate
    pub max_turns_per_encounter: u32,

    /// Drink a potion below this fraction of max HP
    pub potion_below: f64,

    /// Try to flee below this fraction of max HP once potions run out
    pub flee_below: f64,

    /// Cast the strongest ready damage skill instead of attacking
    pub use_skills: bool,

    /// Bring a dog along
    pub with_pet: bool,

    /// Spawn weights by monster name
    pub species_weights: Vec<(String, u32)>,

    /// Roll below this for a boss
    pub boss_chance: f64,

    /// Roll below this (and not a boss) for an elite
    pub elite_chance: f64,

    /// Encounter rules handed to the resolver
    pub combat: CombatConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            encounters_per_run: 50,
            max_turns_per_encounter: 100,
            potion_below: 0.3,
            flee_below: 0.15,
            use_skills: true,
            with_pet: false,
            species_weights: vec![
                ("史莱姆".to_string(), 40),
                ("哥布林".to_string(), 30),
                ("骷髅".to_string(), 20),
                ("蝙蝠".to_string(), 10),
            ],
            boss_chance: 0.01,
            elite_chance: 0.1,
            combat: CombatConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for a fast balance check
    pub fn quick() -> Self {
        Self {
            num_runs: 100,
            encounters_per_run: 20,
            ..Default::default()
        }
    }

    /// Every encounter is a boss
    pub fn boss_rush(num_runs: u32) -> Self {
        Self {
            num_runs,
            encounters_per_run: 10,
            boss_chance: 1.0,
            ..Default::default()
        }
    }

    /// Loot analysis with a loyal pet along
    pub fn with_pet(num_runs: u32) -> Self {
        Self {
            num_runs,
            with_pet: true,
            ..Default::default()
        }
    }
}
