//! End-to-end encounter scenarios driven through the public resolver API.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish::character::{Pet, PetKind, Player};
use skirmish::combat::{
    spawn_monster, CombatPhase, CombatSystem, Combatant, CombatantKind, EncounterOutcome, EventKind,
    ScheduledStep, Tier,
};
use skirmish::core::{CombatConfig, CombatError};
use skirmish::items::{resolve_drops, ItemId};

const SLIME: &str = "史莱姆";

fn system(seed: u64) -> CombatSystem {
    CombatSystem::with_seed(CombatConfig::default(), seed)
}

/// A player strong enough to kill a level-1 slime in one hit.
fn veteran() -> Player {
    let mut player = Player::new("勇者");
    player.gain_exp(100_000);
    player
}

#[test]
fn test_first_attack_on_slime() {
    let mut combat = system(1);
    let mut player = Player::new("勇者");

    let start = combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    assert!(start.has_event(EventKind::EncounterStart));
    assert_eq!(combat.phase(), CombatPhase::AwaitingPlayer);

    let report = combat.attack(&mut player).unwrap();
    // attack 15 against defense 7
    assert_eq!(report.damage_to(CombatantKind::Monster), 8);
    assert_eq!(combat.monster().unwrap().stats().current_hp, 62);
    assert_eq!(report.next_step, Some(ScheduledStep::MonsterTurn));
    assert_eq!(report.next_delay_ms, Some(1000));
    assert_eq!(combat.phase(), CombatPhase::MonsterTurnPending);

    let monster_turn = combat.advance(&mut player).unwrap();
    assert!(monster_turn.damage_to(CombatantKind::Player) >= 1);
    assert!(player.stats().current_hp < 100);
    assert_eq!(combat.phase(), CombatPhase::AwaitingPlayer);
    assert_eq!(combat.turn_count(), 1);
}

#[test]
fn test_actions_are_refused_without_side_effects() {
    let mut combat = system(2);
    let mut player = Player::new("勇者");

    assert_eq!(combat.attack(&mut player).unwrap_err(), CombatError::NotInCombat);
    assert_eq!(combat.flee(&mut player).unwrap_err(), CombatError::NotInCombat);
    assert!(combat.advance(&mut player).is_none());

    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    assert_eq!(
        combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap_err(),
        CombatError::EncounterInProgress
    );
    combat.attack(&mut player).unwrap();
    let hp_before = combat.monster().unwrap().stats().current_hp;
    let potions_before = player.health_potions;

    assert_eq!(combat.attack(&mut player).unwrap_err(), CombatError::ActionPending);
    assert_eq!(combat.use_potion(&mut player).unwrap_err(), CombatError::ActionPending);
    assert_eq!(combat.monster().unwrap().stats().current_hp, hp_before);
    assert_eq!(player.health_potions, potions_before);
    assert_eq!(combat.turn_count(), 1);
    assert_eq!(
        combat.log().latest().unwrap().message,
        CombatError::ActionPending.to_string()
    );
}

#[test]
fn test_victory_settles_back_to_idle() {
    let mut combat = system(3);
    let mut player = veteran();
    let gold_before = player.gold;

    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    let report = combat.attack(&mut player).unwrap();
    assert_eq!(report.outcome, Some(EncounterOutcome::Victory));
    let reward = report.reward.unwrap();
    assert_eq!(reward.exp, 30);
    assert_eq!(reward.gold, 15);
    assert_eq!(player.gold, gold_before + 15);
    assert_eq!(combat.phase(), CombatPhase::Settling(EncounterOutcome::Victory));

    let settled = combat.run_pending(&mut player);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].outcome, Some(EncounterOutcome::Victory));
    assert_eq!(combat.phase(), CombatPhase::Idle);
    assert!(combat.monster().is_none());
}

#[test]
fn test_new_encounter_cancels_pending_settle() {
    let mut combat = system(4);
    let mut player = veteran();

    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    combat.attack(&mut player).unwrap();
    let first = combat.encounter_id().unwrap();
    assert_eq!(combat.pending_step(), Some(ScheduledStep::Settle));

    combat.start_combat(spawn_monster("哥布林", 1, Tier::Normal)).unwrap();
    assert_ne!(combat.encounter_id(), Some(first));
    assert!(combat.pending_step().is_none());
    assert!(combat.advance(&mut player).is_none());
    assert_eq!(combat.phase(), CombatPhase::AwaitingPlayer);
    assert_eq!(combat.monster().unwrap().base_name(), "哥布林");
}

#[test]
fn test_end_combat_drops_queued_monster_turn() {
    let mut combat = system(5);
    let mut player = Player::new("勇者");

    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    combat.attack(&mut player).unwrap();
    let hp = player.stats().current_hp;

    assert!(combat.end_combat());
    assert!(combat.advance(&mut player).is_none());
    assert_eq!(player.stats().current_hp, hp);
    assert!(!combat.end_combat());
}

#[test]
fn test_boss_is_three_times_normal() {
    let boss = spawn_monster(SLIME, 1, Tier::Boss);
    let stats = boss.stats();
    assert_eq!(stats.max_hp, 210);
    assert_eq!(stats.attack, 45);
    assert_eq!(stats.defense, 21);
    assert_eq!(boss.exp_reward, 90);
    assert_eq!(boss.gold_reward, 45);
    assert!(boss.skills().get("recover").is_some());
    assert!(boss.skills().get("frenzy").is_some());
    assert!(boss.name().ends_with(SLIME));

    let elite = spawn_monster(SLIME, 1, Tier::Elite);
    assert_eq!(elite.stats().max_hp, 105);
    assert!(elite.skills().get("recover").is_some());
    assert!(elite.skills().get("frenzy").is_none());
}

#[test]
fn test_pet_assist_requires_loyalty() {
    let mut player = Player::new("勇者");
    let mut pet = Pet::new("旺财", PetKind::Dog);
    pet.set_loyalty(25);
    player.adopt_pet(pet);

    let mut combat = system(6);
    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    let report = combat.attack(&mut player).unwrap();
    assert_eq!(report.damage_to(CombatantKind::Monster), 8);
    assert!(!report.events.iter().any(|e| e.source == CombatantKind::Pet));
    combat.end_combat();

    player.pet_mut().unwrap().set_loyalty(30);
    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    let report = combat.attack(&mut player).unwrap();
    // 8 from the player, floor(8 * 0.5) from the bite
    assert_eq!(report.damage_to(CombatantKind::Monster), 12);
}

#[test]
fn test_flee_succeeds_about_seventy_percent() {
    let mut combat = system(7);
    let mut player = veteran();
    let mut fled = 0;

    for _ in 0..1000 {
        combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
        let report = combat.flee(&mut player).unwrap();
        match report.outcome {
            Some(EncounterOutcome::Fled) => {
                fled += 1;
                assert_eq!(report.next_step, Some(ScheduledStep::Settle));
            }
            _ => {
                assert!(report.has_event(EventKind::FleeFailed));
                assert_eq!(report.next_step, Some(ScheduledStep::MonsterTurn));
            }
        }
        combat.end_combat();
        player.rest();
    }

    assert!((650..=750).contains(&fled), "fled {} of 1000", fled);
}

#[test]
fn test_potion_heal_is_capped_at_max_hp() {
    let mut combat = system(8);
    let mut player = Player::with_starter_gear("勇者");
    let max = player.effective_max_hp();

    combat.start_combat(spawn_monster(SLIME, 1, Tier::Normal)).unwrap();
    player.take_damage(30);
    let report = combat.use_potion(&mut player).unwrap();
    let healed = report
        .events
        .iter()
        .find(|e| e.kind == EventKind::Heal)
        .map(|e| e.value)
        .unwrap();
    assert_eq!(healed, 30);
    assert_eq!(player.stats().current_hp, max);
    assert_eq!(player.health_potions, 2);
}

#[test]
fn test_defeat_ends_encounter() {
    let mut combat = system(9);
    let mut player = Player::new("勇者");
    player.health_potions = 0;

    combat.start_combat(spawn_monster(SLIME, 10, Tier::Boss)).unwrap();
    let mut outcome = None;
    for _ in 0..50 {
        combat.attack(&mut player).unwrap();
        let reports = combat.run_pending(&mut player);
        if let Some(report) = reports.iter().find(|r| r.outcome.is_some()) {
            outcome = report.outcome;
            break;
        }
    }

    assert_eq!(outcome, Some(EncounterOutcome::Defeat));
    assert_eq!(player.stats().current_hp, 0);
    assert_eq!(combat.phase(), CombatPhase::Idle);
}

#[test]
fn test_observed_drop_rate_converges() {
    let slime = spawn_monster(SLIME, 1, Tier::Normal);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let rolls = 20_000;

    let crystals: usize = (0..rolls)
        .map(|_| resolve_drops(slime.loot_table(), 0.3, &mut rng))
        .map(|items| items.iter().filter(|&&i| i == ItemId::MagicCrystal).count())
        .sum();

    // 0.3 drop check times 0.3 entry chance
    let rate = crystals as f64 / rolls as f64;
    assert!((rate - 0.09).abs() < 0.01, "rate {}", rate);
}
