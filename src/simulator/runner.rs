//! Main simulation runner driving the real combat resolver.
//!
//! Each run plays one player through a series of encounters, choosing actions
//! with a simple policy. Statistics are tracked externally from the
//! `TurnReport`s the resolver returns.

use super::config::SimConfig;
use super::report::SimReport;
use super::spawner::Spawner;
use crate::character::pet::{Pet, PetKind};
use crate::character::player::Player;
use crate::combat::monster::Tier;
use crate::combat::resolver::CombatSystem;
use crate::combat::types::{Combatant, EncounterOutcome, TurnReport};
use crate::core::error::CombatError;
use crate::items::ItemId;
use crate::skills::EffectType;
use rand::distributions::WeightedError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid species weights: {0}")]
    InvalidWeights(#[from] WeightedError),
}

/// Totals for a single run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub encounters: u32,
    pub victories: u32,
    pub defeats: u32,
    pub flees: u32,
    pub stalemates: u32,
    pub elite_kills: u32,
    pub boss_kills: u32,
    pub total_turns: u64,
    pub potions_used: u32,
    pub skills_cast: u32,
    pub exp_earned: u64,
    pub gold_earned: u64,
    pub final_level: u32,
    pub final_gold: u64,
    pub pet_level: Option<u32>,
    pub drops: BTreeMap<ItemId, u32>,
    pub items_discarded: u32,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, SimError> {
    let spawner = Spawner::new(&config.species_weights, config.boss_chance, config.elite_chance)?;
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, &spawner, &mut rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level {}, Wins {}, Losses {}, Fled {}, Gold {}",
                run_idx + 1,
                config.num_runs,
                run.final_level,
                run.victories,
                run.defeats,
                run.flees,
                run.final_gold
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// One player fighting `encounters_per_run` fights, resting in between.
pub fn simulate_single_run(config: &SimConfig, spawner: &Spawner, rng: &mut ChaCha8Rng) -> RunStats {
    let mut player = Player::with_starter_gear("模拟勇者");
    if config.with_pet {
        player.adopt_pet(Pet::new("旺财", PetKind::Dog));
    }
    let mut combat = CombatSystem::with_seed(config.combat.clone(), rng.gen());
    let mut stats = RunStats::default();

    for _ in 0..config.encounters_per_run {
        let monster = spawner.spawn(player.level(), rng);
        let tier = monster.tier;
        if combat.start_combat(monster).is_err() {
            combat.end_combat();
            continue;
        }
        stats.encounters += 1;

        let outcome = fight(config, &mut combat, &mut player, &mut stats);
        match outcome {
            Some(EncounterOutcome::Victory) => {
                stats.victories += 1;
                match tier {
                    Tier::Boss => stats.boss_kills += 1,
                    Tier::Elite => stats.elite_kills += 1,
                    Tier::Normal => {}
                }
            }
            Some(EncounterOutcome::Defeat) => stats.defeats += 1,
            Some(EncounterOutcome::Fled) => stats.flees += 1,
            None => {
                stats.stalemates += 1;
                combat.end_combat();
            }
        }
        player.rest();
    }

    stats.final_level = player.level();
    stats.final_gold = player.gold;
    stats.pet_level = player.pet().map(|p| p.progression().level);
    stats
}

/// Plays one encounter to its end. None when the turn cap is hit.
fn fight(
    config: &SimConfig,
    combat: &mut CombatSystem,
    player: &mut Player,
    stats: &mut RunStats,
) -> Option<EncounterOutcome> {
    for _ in 0..config.max_turns_per_encounter {
        let result = take_action(config, combat, player, stats);
        let report = match result {
            Ok(report) => report,
            Err(err) => {
                debug!(error = %err, "policy action refused, attacking instead");
                combat.attack(player).ok()?
            }
        };
        stats.total_turns += 1;
        if let Some(outcome) = record(&report, player, stats) {
            combat.run_pending(player);
            return Some(outcome);
        }
        for follow_up in combat.run_pending(player) {
            if let Some(outcome) = record(&follow_up, player, stats) {
                combat.run_pending(player);
                return Some(outcome);
            }
        }
    }
    None
}

fn take_action(
    config: &SimConfig,
    combat: &mut CombatSystem,
    player: &mut Player,
    stats: &mut RunStats,
) -> Result<TurnReport, CombatError> {
    let hp = player.stats().hp_fraction();
    if hp < config.potion_below && player.health_potions > 0 {
        let report = combat.use_potion(player)?;
        stats.potions_used += 1;
        return Ok(report);
    }
    if hp < config.flee_below && player.health_potions == 0 {
        return combat.flee(player);
    }
    if config.use_skills {
        if let Some(skill) = strongest_ready_skill(player) {
            let report = combat.cast_skill(player, &skill)?;
            stats.skills_cast += 1;
            return Ok(report);
        }
    }
    combat.attack(player)
}

/// Id of the ready damage skill with the largest magnitude.
fn strongest_ready_skill(player: &Player) -> Option<String> {
    let caster = player.stats();
    let mana = player.mana();
    player
        .skills()
        .iter()
        .filter(|s| s.effect == EffectType::Damage)
        .filter(|s| player.skills().check(&s.id, caster.level, Some(&mana)).is_ok())
        .max_by_key(|s| s.resolve(&caster).magnitude)
        .map(|s| s.id.clone())
}

/// Folds a report into the run totals, collecting any loot.
fn record(report: &TurnReport, player: &mut Player, stats: &mut RunStats) -> Option<EncounterOutcome> {
    if let Some(reward) = &report.reward {
        stats.exp_earned += reward.exp;
        stats.gold_earned += reward.gold;
        for item in &reward.items {
            *stats.drops.entry(*item).or_insert(0) += 1;
        }
        stats.items_discarded += player.collect_loot(&reward.items).len() as u32;
    }
    report.outcome
}
