//! Encounter state machine.
//!
//! Every action resolves its game logic immediately and returns a
//! `TurnReport`. Follow-up steps (the monster's turn, settling back to idle)
//! are queued with a suggested delay and run when the caller calls
//! `advance`, so pacing belongs to whoever renders the fight.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::monster::Monster;
use super::types::*;
use crate::character::buffs::BuffSet;
use crate::character::player::Player;
use crate::core::combat_math::compute_damage;
use crate::core::config::CombatConfig;
use crate::core::error::CombatError;
use crate::items::resolve_drops;
use crate::skills::{EffectType, SkillEffect};

#[derive(Debug, Clone)]
struct Encounter {
    id: u64,
    monster: Monster,
    turn: u32,
}

#[derive(Debug, Clone, Copy)]
struct PendingStep {
    encounter_id: u64,
    step: ScheduledStep,
    delay: Duration,
}

/// Drives one encounter at a time between a player and a monster.
///
/// The player is borrowed per call and keeps its identity across encounters.
/// The monster is owned for the length of the encounter and dropped when it
/// settles.
#[derive(Debug, Clone)]
pub struct CombatSystem<R: Rng = ChaCha8Rng> {
    config: CombatConfig,
    rng: R,
    phase: CombatPhase,
    encounter: Option<Encounter>,
    pending: Option<PendingStep>,
    last_encounter_id: u64,
    log: CombatLog,
}

impl CombatSystem<ChaCha8Rng> {
    pub fn with_seed(config: CombatConfig, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> CombatSystem<R> {
    pub fn new(config: CombatConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            phase: CombatPhase::Idle,
            encounter: None,
            pending: None,
            last_encounter_id: 0,
            log: CombatLog::default(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_in_combat(&self) -> bool {
        self.phase != CombatPhase::Idle
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.encounter.as_ref().map(|e| &e.monster)
    }

    /// Player turns taken in the current encounter.
    pub fn turn_count(&self) -> u32 {
        self.encounter.as_ref().map_or(0, |e| e.turn)
    }

    pub fn encounter_id(&self) -> Option<u64> {
        self.encounter.as_ref().map(|e| e.id)
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn pending_step(&self) -> Option<ScheduledStep> {
        self.pending.map(|p| p.step)
    }

    /// Suggested wait before calling `advance`.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|p| p.delay)
    }

    /// Begins an encounter. Accepted while idle, or while the previous
    /// encounter is settling, in which case its pending settle is cancelled.
    pub fn start_combat(&mut self, monster: Monster) -> Result<TurnReport, CombatError> {
        match self.phase {
            CombatPhase::Idle => {}
            CombatPhase::Settling(outcome) => {
                if let Some(pending) = self.pending.take() {
                    debug!(
                        encounter = pending.encounter_id,
                        ?outcome,
                        "cancelled pending settle for new encounter"
                    );
                }
                self.encounter = None;
            }
            CombatPhase::AwaitingPlayer | CombatPhase::MonsterTurnPending => {
                return self.refuse(CombatError::EncounterInProgress);
            }
        }

        self.last_encounter_id += 1;
        let id = self.last_encounter_id;
        info!(
            encounter = id,
            monster = %monster.name(),
            level = monster.stats().level,
            tier = ?monster.tier,
            "encounter started"
        );

        let mut report = TurnReport::default();
        report.events.push(CombatEvent {
            kind: EventKind::EncounterStart,
            source: CombatantKind::Monster,
            target: CombatantKind::Monster,
            value: 0,
            label: Some("出现".to_string()),
            display_ms: self.config.encounter_start_display_ms,
        });
        let message = format!("{} {} appeared!", monster.sprite(), monster.name());
        self.encounter = Some(Encounter {
            id,
            monster,
            turn: 0,
        });
        self.phase = CombatPhase::AwaitingPlayer;
        self.say(&mut report, message, false);
        Ok(report)
    }

    /// Basic attack, followed by the pet's assist when it is loyal enough.
    pub fn attack(&mut self, player: &mut Player) -> Result<TurnReport, CombatError> {
        let mut encounter = self.take_encounter()?;
        let mut report = TurnReport::default();
        encounter.turn += 1;

        let damage = land_hit(&mut encounter.monster, player.stats().attack);
        debug!(
            encounter = encounter.id,
            turn = encounter.turn,
            damage,
            monster_hp = encounter.monster.stats().current_hp,
            "player attack"
        );
        report.events.push(self.event(
            EventKind::Damage,
            CombatantKind::Player,
            CombatantKind::Monster,
            damage,
            None,
        ));
        let message = format!("You hit {} for {} damage!", encounter.monster.name(), damage);
        self.say(&mut report, message, true);

        if !encounter.monster.is_dead() {
            self.pet_assist(player, &mut encounter.monster, damage, &mut report);
        }
        if let Some(pet) = player.pet_mut() {
            pet.end_turn();
        }
        player.end_turn();
        Ok(self.finish_player_turn(player, encounter, report))
    }

    /// Drinks a health potion, then hands the turn to the monster.
    pub fn use_potion(&mut self, player: &mut Player) -> Result<TurnReport, CombatError> {
        let mut encounter = self.take_encounter()?;
        let healed = match player.use_health_potion(self.config.potion_heal) {
            Ok(healed) => healed,
            Err(err) => {
                self.encounter = Some(encounter);
                return self.refuse(err);
            }
        };
        encounter.turn += 1;

        let mut report = TurnReport::default();
        report.events.push(self.event(
            EventKind::Heal,
            CombatantKind::Player,
            CombatantKind::Player,
            healed,
            Some("生命药水".to_string()),
        ));
        let message = format!(
            "You drink a health potion and recover {} HP ({} left).",
            healed, player.health_potions
        );
        self.say(&mut report, message, true);
        player.end_turn();
        Ok(self.finish_player_turn(player, encounter, report))
    }

    /// Uses one of the player's skills. The pet does not assist on skill turns.
    pub fn cast_skill(&mut self, player: &mut Player, skill_id: &str) -> Result<TurnReport, CombatError> {
        let mut encounter = self.take_encounter()?;
        let effect = match player.use_skill(skill_id) {
            Ok(effect) => effect,
            Err(err) => {
                self.encounter = Some(encounter);
                return self.refuse(err);
            }
        };
        encounter.turn += 1;
        debug!(
            encounter = encounter.id,
            skill = %effect.skill_id,
            magnitude = effect.magnitude,
            mana = player.mana().current,
            "player skill"
        );

        let mut report = TurnReport::default();
        let monster = &mut encounter.monster;
        let target = match effect.effect {
            EffectType::Damage | EffectType::Debuff => CombatantKind::Monster,
            EffectType::Heal | EffectType::Buff => CombatantKind::Player,
        };
        report.events.push(self.event(
            EventKind::Skill,
            CombatantKind::Player,
            target,
            effect.magnitude,
            Some(effect.name.clone()),
        ));

        let message = match effect.effect {
            EffectType::Damage => {
                let damage = land_hit(monster, effect.magnitude);
                report.events.push(self.event(
                    EventKind::Damage,
                    CombatantKind::Player,
                    CombatantKind::Monster,
                    damage,
                    Some(effect.name.clone()),
                ));
                format!("You cast {} on {} for {} damage!", effect.name, monster.name(), damage)
            }
            EffectType::Heal => {
                let healed = player.heal(effect.magnitude);
                report.events.push(self.event(
                    EventKind::Heal,
                    CombatantKind::Player,
                    CombatantKind::Player,
                    healed,
                    Some(effect.name.clone()),
                ));
                format!("You cast {} and recover {} HP.", effect.name, healed)
            }
            EffectType::Buff => {
                let turns = apply_buff(&effect, player.buffs_mut());
                report.events.push(self.event(
                    EventKind::Buff,
                    CombatantKind::Player,
                    CombatantKind::Player,
                    effect.magnitude,
                    Some(effect.name.clone()),
                ));
                format!("You cast {}: attack +{}% for {} turns.", effect.name, effect.magnitude, turns)
            }
            EffectType::Debuff => {
                let turns = apply_buff(&effect, monster.buffs_mut());
                report.events.push(self.event(
                    EventKind::Debuff,
                    CombatantKind::Player,
                    CombatantKind::Monster,
                    effect.magnitude,
                    Some(effect.name.clone()),
                ));
                format!(
                    "You cast {}: {} attack -{}% for {} turns.",
                    effect.name,
                    monster.name(),
                    effect.magnitude,
                    turns
                )
            }
        };
        self.say(&mut report, message, true);
        player.end_turn();
        Ok(self.finish_player_turn(player, encounter, report))
    }

    /// Tries to run away. On failure the monster still gets its turn.
    pub fn flee(&mut self, player: &mut Player) -> Result<TurnReport, CombatError> {
        let mut encounter = self.take_encounter()?;
        encounter.turn += 1;
        let roll: f64 = self.rng.gen();
        let mut report = TurnReport::default();

        if roll > self.config.flee_fail_threshold {
            info!(encounter = encounter.id, roll, "player fled");
            report.events.push(self.event(
                EventKind::Flee,
                CombatantKind::Player,
                CombatantKind::Monster,
                0,
                None,
            ));
            self.say(&mut report, "You escaped from the fight!".to_string(), true);
            report.outcome = Some(EncounterOutcome::Fled);
            self.encounter = Some(encounter);
            self.phase = CombatPhase::Settling(EncounterOutcome::Fled);
            self.schedule(ScheduledStep::Settle, &mut report);
        } else {
            debug!(encounter = encounter.id, roll, "flee failed");
            report.events.push(self.event(
                EventKind::FleeFailed,
                CombatantKind::Player,
                CombatantKind::Monster,
                0,
                None,
            ));
            self.say(&mut report, "You failed to escape!".to_string(), true);
            player.end_turn();
            self.encounter = Some(encounter);
            self.phase = CombatPhase::MonsterTurnPending;
            self.schedule(ScheduledStep::MonsterTurn, &mut report);
        }
        Ok(report)
    }

    /// Runs the queued step, if any. A step left over from an encounter that
    /// is no longer current is discarded.
    pub fn advance(&mut self, player: &mut Player) -> Option<TurnReport> {
        let pending = self.pending.take()?;
        if self.encounter_id() != Some(pending.encounter_id) {
            warn!(
                step = ?pending.step,
                encounter = pending.encounter_id,
                "discarding step from a finished encounter"
            );
            return None;
        }
        Some(match pending.step {
            ScheduledStep::MonsterTurn => self.monster_turn(player),
            ScheduledStep::Settle => self.settle(),
        })
    }

    /// Runs queued steps until none remain.
    pub fn run_pending(&mut self, player: &mut Player) -> Vec<TurnReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.advance(player) {
            reports.push(report);
        }
        reports
    }

    /// Drops the current encounter and anything queued for it. Returns false
    /// when already idle.
    pub fn end_combat(&mut self) -> bool {
        if self.phase == CombatPhase::Idle {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            debug!(encounter = pending.encounter_id, step = ?pending.step, "cancelled pending step");
        }
        if let Some(encounter) = self.encounter.take() {
            info!(encounter = encounter.id, turns = encounter.turn, "encounter abandoned");
        }
        self.phase = CombatPhase::Idle;
        true
    }

    fn monster_turn(&mut self, player: &mut Player) -> TurnReport {
        let mut report = TurnReport::default();
        let Some(mut encounter) = self.encounter.take() else {
            self.phase = CombatPhase::Idle;
            return report;
        };

        let action = encounter.monster.take_turn(&mut self.rng);
        let monster_name = encounter.monster.name().to_string();
        debug!(
            encounter = encounter.id,
            action = %action.name,
            magnitude = action.magnitude,
            "monster turn"
        );
        if !action.skill_id.is_empty() {
            let target = match action.effect {
                EffectType::Damage | EffectType::Debuff => CombatantKind::Player,
                EffectType::Heal | EffectType::Buff => CombatantKind::Monster,
            };
            report.events.push(self.event(
                EventKind::Skill,
                CombatantKind::Monster,
                target,
                action.magnitude,
                Some(action.name.clone()),
            ));
        }

        let message = match action.effect {
            EffectType::Damage => {
                let damage = land_hit(player, action.magnitude);
                report.events.push(self.event(
                    EventKind::Damage,
                    CombatantKind::Monster,
                    CombatantKind::Player,
                    damage,
                    Some(action.name.clone()),
                ));
                format!("{} uses {} for {} damage!", monster_name, action.name, damage)
            }
            EffectType::Heal => {
                let healed = encounter.monster.heal(action.magnitude);
                report.events.push(self.event(
                    EventKind::Heal,
                    CombatantKind::Monster,
                    CombatantKind::Monster,
                    healed,
                    Some(action.name.clone()),
                ));
                format!("{} uses {} and recovers {} HP!", monster_name, action.name, healed)
            }
            EffectType::Debuff => {
                let turns = apply_buff(&action, player.buffs_mut());
                report.events.push(self.event(
                    EventKind::Debuff,
                    CombatantKind::Monster,
                    CombatantKind::Player,
                    action.magnitude,
                    Some(action.name.clone()),
                ));
                format!(
                    "{} uses {}: your attack -{}% for {} turns!",
                    monster_name, action.name, action.magnitude, turns
                )
            }
            EffectType::Buff => {
                let turns = apply_buff(&action, encounter.monster.buffs_mut());
                report.events.push(self.event(
                    EventKind::Buff,
                    CombatantKind::Monster,
                    CombatantKind::Monster,
                    action.magnitude,
                    Some(action.name.clone()),
                ));
                format!(
                    "{} uses {}: attack +{}% for {} turns!",
                    monster_name, action.name, action.magnitude, turns
                )
            }
        };
        self.say(&mut report, message, false);
        encounter.monster.buffs_mut().tick();

        if player.is_dead() {
            info!(encounter = encounter.id, turns = encounter.turn, "player defeated");
            report.events.push(self.event(
                EventKind::Defeat,
                CombatantKind::Monster,
                CombatantKind::Player,
                0,
                None,
            ));
            self.say(&mut report, "You were defeated!".to_string(), false);
            report.outcome = Some(EncounterOutcome::Defeat);
            self.encounter = Some(encounter);
            self.phase = CombatPhase::Settling(EncounterOutcome::Defeat);
            self.schedule(ScheduledStep::Settle, &mut report);
        } else {
            self.encounter = Some(encounter);
            self.phase = CombatPhase::AwaitingPlayer;
        }
        report
    }

    fn settle(&mut self) -> TurnReport {
        let outcome = match self.phase {
            CombatPhase::Settling(outcome) => Some(outcome),
            _ => None,
        };
        if let Some(encounter) = self.encounter.take() {
            info!(encounter = encounter.id, ?outcome, turns = encounter.turn, "encounter ended");
        }
        self.phase = CombatPhase::Idle;
        TurnReport {
            outcome,
            ..Default::default()
        }
    }

    fn pet_assist(
        &mut self,
        player: &mut Player,
        monster: &mut Monster,
        player_damage: u32,
        report: &mut TurnReport,
    ) {
        let threshold = self.config.pet_loyalty_threshold;
        let Some(pet) = player.pet_mut() else {
            return;
        };
        if !pet.is_loyal_enough(threshold) {
            debug!(loyalty = pet.loyalty(), threshold, "pet not loyal enough to assist");
            return;
        }
        let pet_name = pet.name.clone();
        let Some(effect) = pet.assist(player_damage) else {
            return;
        };

        report.events.push(self.event(
            EventKind::Skill,
            CombatantKind::Pet,
            if effect.effect == EffectType::Damage {
                CombatantKind::Monster
            } else {
                CombatantKind::Player
            },
            effect.magnitude,
            Some(effect.name.clone()),
        ));
        let message = match effect.effect {
            EffectType::Damage => {
                monster.take_damage(effect.magnitude);
                report.events.push(self.event(
                    EventKind::Damage,
                    CombatantKind::Pet,
                    CombatantKind::Monster,
                    effect.magnitude,
                    Some(effect.name.clone()),
                ));
                format!("{} uses {} for {} damage!", pet_name, effect.name, effect.magnitude)
            }
            EffectType::Heal => {
                let healed = player.heal(effect.magnitude);
                report.events.push(self.event(
                    EventKind::Heal,
                    CombatantKind::Pet,
                    CombatantKind::Player,
                    healed,
                    Some(effect.name.clone()),
                ));
                format!("{} uses {}: you recover {} HP.", pet_name, effect.name, healed)
            }
            EffectType::Buff | EffectType::Debuff => {
                let turns = apply_buff(&effect, player.buffs_mut());
                report.events.push(self.event(
                    EventKind::Buff,
                    CombatantKind::Pet,
                    CombatantKind::Player,
                    effect.magnitude,
                    Some(effect.name.clone()),
                ));
                format!(
                    "{} uses {}: your attack +{}% for {} turns.",
                    pet_name, effect.name, effect.magnitude, turns
                )
            }
        };
        self.say(report, message, false);
    }

    /// Either the monster died (victory) or it gets the next turn.
    fn finish_player_turn(&mut self, player: &mut Player, encounter: Encounter, mut report: TurnReport) -> TurnReport {
        if encounter.monster.is_dead() {
            return self.victory(player, encounter, report);
        }
        self.encounter = Some(encounter);
        self.phase = CombatPhase::MonsterTurnPending;
        self.schedule(ScheduledStep::MonsterTurn, &mut report);
        report
    }

    fn victory(&mut self, player: &mut Player, encounter: Encounter, mut report: TurnReport) -> TurnReport {
        let monster = &encounter.monster;
        let exp = monster.exp_reward;
        let gold = monster.gold_reward;
        let items = resolve_drops(monster.loot_table(), self.config.drop_check_chance, &mut self.rng);

        let levels_gained = player.gain_exp(exp);
        player.gain_gold(gold);
        let share = (exp as f64 * self.config.pet_exp_share.max(0.0)).floor() as u64;
        let (pet_exp, pet_levels_gained) = match player.pet_mut() {
            Some(pet) => (share, pet.gain_exp(share)),
            None => (0, 0),
        };
        info!(
            encounter = encounter.id,
            turns = encounter.turn,
            exp,
            gold,
            drops = items.len(),
            "monster defeated"
        );

        report.events.push(self.event(
            EventKind::Victory,
            CombatantKind::Player,
            CombatantKind::Monster,
            exp as u32,
            None,
        ));
        let mut message = format!("Victory! Gained {} exp and {} gold.", exp, gold);
        for item in &items {
            let def = item.def();
            message.push_str(&format!("\nObtained {} {}", def.icon, def.name));
        }
        self.say(&mut report, message, false);

        if levels_gained > 0 {
            report.events.push(self.event(
                EventKind::LevelUp,
                CombatantKind::Player,
                CombatantKind::Player,
                player.level(),
                None,
            ));
            let message = format!("Level up! You are now level {}.", player.level());
            self.say(&mut report, message, false);
        }
        if pet_levels_gained > 0 {
            if let Some(pet) = player.pet() {
                let level = pet.progression().level;
                report.events.push(self.event(
                    EventKind::LevelUp,
                    CombatantKind::Pet,
                    CombatantKind::Pet,
                    level,
                    None,
                ));
                let message = format!("{} reached level {}!", pet.name, level);
                self.say(&mut report, message, false);
            }
        }

        report.reward = Some(Reward {
            exp,
            gold,
            items,
            pet_exp,
            levels_gained,
            pet_levels_gained,
        });
        report.outcome = Some(EncounterOutcome::Victory);
        self.encounter = Some(encounter);
        self.phase = CombatPhase::Settling(EncounterOutcome::Victory);
        self.schedule(ScheduledStep::Settle, &mut report);
        report
    }

    /// Checks the phase and takes the encounter out for the length of a
    /// player action. Callers must put it back.
    fn take_encounter(&mut self) -> Result<Encounter, CombatError> {
        match self.phase {
            CombatPhase::AwaitingPlayer => {}
            CombatPhase::Idle => return self.refuse(CombatError::NotInCombat),
            CombatPhase::MonsterTurnPending | CombatPhase::Settling(_) => {
                return self.refuse(CombatError::ActionPending)
            }
        }
        match self.encounter.take() {
            Some(encounter) => Ok(encounter),
            None => self.refuse(CombatError::NotInCombat),
        }
    }

    fn schedule(&mut self, step: ScheduledStep, report: &mut TurnReport) {
        let delay = match step {
            ScheduledStep::MonsterTurn => self.config.monster_turn_delay(),
            ScheduledStep::Settle => self.config.settle_delay(),
        };
        let Some(encounter_id) = self.encounter_id() else {
            return;
        };
        self.pending = Some(PendingStep {
            encounter_id,
            step,
            delay,
        });
        report.next_step = Some(step);
        report.next_delay_ms = Some(delay.as_millis() as u64);
    }

    fn refuse<T>(&mut self, err: CombatError) -> Result<T, CombatError> {
        debug!(error = %err, phase = ?self.phase, "action refused");
        self.log.push(err.to_string(), true);
        Err(err)
    }

    fn say(&mut self, report: &mut TurnReport, message: String, is_player_action: bool) {
        self.log.push(message.clone(), is_player_action);
        report.messages.push(message);
    }

    fn event(
        &self,
        kind: EventKind,
        source: CombatantKind,
        target: CombatantKind,
        value: u32,
        label: Option<String>,
    ) -> CombatEvent {
        CombatEvent {
            kind,
            source,
            target,
            value,
            label,
            display_ms: self.config.action_display_ms,
        }
    }
}

/// Hits `target` with `attack` against its effective defense. Returns the
/// damage dealt.
fn land_hit(target: &mut dyn Combatant, attack: u32) -> u32 {
    let damage = compute_damage(attack, target.stats().defense);
    target.take_damage(damage);
    damage
}

/// Adds the effect's timed modifier, returning how many turns it lasts.
fn apply_buff(effect: &SkillEffect, buffs: &mut BuffSet) -> u32 {
    match &effect.buff {
        Some(buff) => {
            buffs.add(buff.clone());
            buff.remaining_turns
        }
        None => 0,
    }
}
