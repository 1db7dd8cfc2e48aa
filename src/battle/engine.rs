//! Battle engine orchestrator
//!
//! Owns the turn and action-slot state machine, the global tick clock,
//! skill execution with chain gating and target resolution, and the
//! cooldown/effect/modifier lifecycle. The engine also owns the RNG;
//! seeding it is the only lever determinism needs.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::battle::character::CharacterDef;
use crate::battle::combatant::{CombatantState, ModifierId, ModifierInstance, ModifierKey};
use crate::battle::events::{BattleEventKind, EventLog};
use crate::battle::formation::{can_melee, can_ranged, disengage, engage, members_of_group};
use crate::battle::initiative::compute_turn_order;
use crate::battle::reactions::reaction_candidates;
use crate::battle::skill::{RangeClass, Skill, Step, StepKind, TargetArea};
use crate::battle::state::BattleState;
use crate::battle::timebase::turns_to_ticks_for_battle;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{ActionSlot, CombatantId, GroupId, Team};
use crate::rules::basic_attack::{basic_attack, execute_reaction_attacks, AttackOutcome};
use crate::rules::checks::status_check;
use crate::rules::constants::DISPEL_INFLICT;
use crate::rules::indices::{compute_status_resist_index, CritStat, IndexModifiers, StatusId};

pub struct BattleEngine {
    config: BattleConfig,
    rng: ChaCha8Rng,
}

impl BattleEngine {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Engine with a deterministic RNG; same seed, same battle
    pub fn with_seed(config: BattleConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Build the opening battle state from the two rosters
    ///
    /// Ids must be unique across both sides and at least one combatant
    /// must exist. Allies and enemies each start grouped together.
    pub fn create_battle(
        &self,
        allies: &[CharacterDef],
        enemies: &[CharacterDef],
    ) -> Result<BattleState> {
        let mut defs: AHashMap<CombatantId, CharacterDef> = AHashMap::new();
        for def in allies.iter().chain(enemies.iter()) {
            if defs.contains_key(&def.id) {
                return Err(BattleError::DuplicateCombatant(def.id.clone()));
            }
            defs.insert(def.id.clone(), def.clone());
        }
        if defs.is_empty() {
            return Err(BattleError::EmptyRoster);
        }

        let mut combatants: AHashMap<CombatantId, CombatantState> = AHashMap::new();
        let mut groups: AHashMap<GroupId, Vec<CombatantId>> = AHashMap::new();

        for (side, team, gid) in [
            (allies, Team::Ally, self.config.ally_group_id),
            (enemies, Team::Enemy, self.config.enemy_group_id),
        ] {
            for def in side {
                groups.entry(gid).or_default().push(def.id.clone());
                combatants.insert(
                    def.id.clone(),
                    CombatantState::new(def.id.clone(), team, def.max_hp, gid),
                );
            }
        }

        let turn_order = compute_turn_order(&defs);

        let mut bs = BattleState {
            defs,
            combatants,
            turn_order,
            turn_index: 0,
            tick: 0,
            groups,
            ended: false,
            end_reason: None,
        };

        let first = bs.current_actor_id().clone();
        if let Some(st) = bs.combatants.get_mut(&first) {
            st.main_available = true;
            st.sub_available = true;
        }
        Ok(bs)
    }

    /// Execute a skill for the current actor
    ///
    /// Consumes the declared slot, validates the skill cooldown before any
    /// step runs, executes the step chain, then registers the cooldown
    /// whether or not the chain broke part-way.
    pub fn apply_skill(&mut self, bs: &mut BattleState, skill: &Skill) -> Result<EventLog> {
        let mut log = EventLog::new();
        let current = bs.current_actor_id().clone();

        if bs.combatant(&current)?.is_down() {
            tracing::debug!(actor = %current, "turn skipped, actor is down");
            log.push(
                BattleEventKind::TurnSkipped {
                    actor: current.clone(),
                },
                format!("{current} is down; action skipped"),
                bs.tick,
            );
            return Ok(log);
        }

        if skill.actor != current {
            return Err(BattleError::OutOfTurn(skill.actor.clone()));
        }

        self.consume_slot(bs, &current, skill.slot, &mut log)?;

        if let Some(&ticks_left) = bs.combatant(&current)?.cooldowns.get(&skill.id) {
            if ticks_left > 0 {
                return Err(BattleError::SkillOnCooldown {
                    skill: skill.id.clone(),
                    ticks_left,
                });
            }
        }

        self.run_steps(bs, &current, skill.crit_stat, &skill.steps, &mut log)?;

        if skill.cooldown_turns > 0 {
            let ticks = turns_to_ticks_for_battle(bs, skill.cooldown_turns);
            bs.combatant_mut(&current)?
                .cooldowns
                .insert(skill.id.clone(), ticks);
            log.push(
                BattleEventKind::CooldownSet {
                    actor: current.clone(),
                    skill: skill.id.clone(),
                    ticks,
                },
                format!(
                    "{current} put {} on cooldown for {} turns ({ticks} ticks)",
                    skill.id, skill.cooldown_turns
                ),
                bs.tick,
            );
        }

        self.note_battle_end(bs, &mut log);
        Ok(log)
    }

    /// Execute a raw step list for the current actor
    ///
    /// Same pipeline as a skill without the cooldown bookkeeping. Useful
    /// for one-off commands that no authored skill covers.
    pub fn apply_steps(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        slot: ActionSlot,
        crit_stat: CritStat,
        steps: &[Step],
    ) -> Result<EventLog> {
        let mut log = EventLog::new();
        let current = bs.current_actor_id().clone();

        if bs.combatant(&current)?.is_down() {
            tracing::debug!(actor = %current, "turn skipped, actor is down");
            log.push(
                BattleEventKind::TurnSkipped {
                    actor: current.clone(),
                },
                format!("{current} is down; action skipped"),
                bs.tick,
            );
            return Ok(log);
        }

        if *actor != current {
            return Err(BattleError::OutOfTurn(actor.clone()));
        }

        self.consume_slot(bs, &current, slot, &mut log)?;
        self.run_steps(bs, &current, crit_stat, steps, &mut log)?;
        self.note_battle_end(bs, &mut log);
        Ok(log)
    }

    /// Close the current turn
    ///
    /// Advances the global tick, decays every duration-bearing entry on
    /// every combatant, rotates to the next actor and refreshes both of
    /// their action slots. Down actors are not skipped here; the skip is
    /// decided when they are asked to act.
    pub fn end_turn(&mut self, bs: &mut BattleState) -> EventLog {
        let mut log = EventLog::new();

        bs.tick += 1;
        decay_all(bs);

        bs.turn_index = (bs.turn_index + 1) % bs.turn_order.len();
        let next = bs.current_actor_id().clone();
        if let Some(st) = bs.combatants.get_mut(&next) {
            st.main_available = true;
            st.sub_available = true;
        }

        tracing::debug!(tick = bs.tick, next = %next, "turn ended");
        log.push(
            BattleEventKind::TurnEnded { next: next.clone() },
            format!("turn ended; {next} is up"),
            bs.tick,
        );
        log
    }

    // ----------------- internal -----------------

    fn consume_slot(
        &self,
        bs: &mut BattleState,
        actor: &CombatantId,
        slot: ActionSlot,
        log: &mut EventLog,
    ) -> Result<()> {
        let tick = bs.tick;
        let st = bs.combatant_mut(actor)?;
        let available = match slot {
            ActionSlot::Main => &mut st.main_available,
            ActionSlot::Sub => &mut st.sub_available,
        };
        if !*available {
            return Err(BattleError::SlotAlreadyUsed {
                actor: actor.clone(),
                slot,
            });
        }
        *available = false;

        log.push(
            BattleEventKind::SlotConsumed {
                actor: actor.clone(),
                slot,
            },
            format!("{actor} spent the {slot:?} slot"),
            tick,
        );
        Ok(())
    }

    fn run_steps(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        crit_stat: CritStat,
        steps: &[Step],
        log: &mut EventLog,
    ) -> Result<()> {
        // The running result starts at 1 so an ungated first step always runs
        let mut prev: i32 = 1;
        for (index, step) in steps.iter().enumerate() {
            if prev < step.require_prev_gte {
                log.push(
                    BattleEventKind::StepSkipped { index },
                    format!(
                        "step {index} ({}) skipped: previous result {prev} below gate {}",
                        step.kind.label(),
                        step.require_prev_gte
                    ),
                    bs.tick,
                );
                log.push(
                    BattleEventKind::ChainBroken { index },
                    format!("chain broken at step {index}"),
                    bs.tick,
                );
                break;
            }
            prev = self.execute_step(bs, actor, crit_stat, index, step, log)?;
        }
        Ok(())
    }

    fn execute_step(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        crit_stat: CritStat,
        index: usize,
        step: &Step,
        log: &mut EventLog,
    ) -> Result<i32> {
        match &step.kind {
            StepKind::MoveEngage => {
                let target = match &step.anchor {
                    Some(t) => t.clone(),
                    None => return Err(BattleError::MissingAnchor { index }),
                };
                let prev_gid = bs.combatant(actor)?.group_id;
                engage(bs, actor, &target)?;
                log.push(
                    BattleEventKind::Engaged {
                        actor: actor.clone(),
                        target: target.clone(),
                    },
                    format!("{actor} moved into {target}'s group"),
                    bs.tick,
                );
                self.run_reactions(bs, actor, prev_gid, step.reaction_immune, log)?;
                Ok(1)
            }
            StepKind::MoveDisengage => {
                let prev_gid = bs.combatant(actor)?.group_id;
                let new_gid = disengage(bs, actor)?;
                log.push(
                    BattleEventKind::Disengaged {
                        actor: actor.clone(),
                        group: new_gid,
                    },
                    format!("{actor} fell back into group {new_gid}"),
                    bs.tick,
                );
                self.run_reactions(bs, actor, prev_gid, step.reaction_immune, log)?;
                Ok(1)
            }
            StepKind::Attack => {
                match self.resolve_targets(bs, actor, index, step, log)? {
                    Some(targets) => self.exec_attack(bs, actor, crit_stat, &targets, log),
                    None => Ok(0),
                }
            }
            StepKind::ApplyEffect {
                effect,
                duration_turns,
                inflict,
            } => match self.resolve_targets(bs, actor, index, step, log)? {
                Some(targets) => {
                    self.exec_apply_effect(bs, actor, &targets, *effect, *duration_turns, *inflict, log)
                }
                None => Ok(0),
            },
            StepKind::RemoveEffect { effect } => {
                match self.resolve_targets(bs, actor, index, step, log)? {
                    Some(targets) => self.exec_remove_effect(bs, actor, &targets, *effect, log),
                    None => Ok(0),
                }
            }
            StepKind::ApplyModifier {
                key,
                delta,
                duration_turns,
            } => match self.resolve_targets(bs, actor, index, step, log)? {
                Some(targets) => {
                    self.exec_apply_modifier(bs, &targets, *key, *delta, *duration_turns, log)
                }
                None => Ok(0),
            },
            StepKind::ApplyHpDelta { amount } => {
                match self.resolve_targets(bs, actor, index, step, log)? {
                    Some(targets) => self.exec_hp_delta(bs, &targets, *amount, log),
                    None => Ok(0),
                }
            }
        }
    }

    /// Resolve a step's target set, or None when it short-circuits
    ///
    /// Out-of-range and empty-set conditions log a diagnostic and resolve
    /// to nothing; they are normal outcomes, not errors. A missing anchor
    /// on a step that needs one is a caller error.
    fn resolve_targets(
        &self,
        bs: &BattleState,
        actor: &CombatantId,
        index: usize,
        step: &Step,
        log: &mut EventLog,
    ) -> Result<Option<Vec<CombatantId>>> {
        // Anchorless all-area steps target everyone and skip the range check
        if step.area == TargetArea::All && step.anchor.is_none() {
            return Ok(Some(bs.turn_order.clone()));
        }

        let anchor = match &step.anchor {
            Some(a) => a,
            None => return Err(BattleError::MissingAnchor { index }),
        };
        bs.combatant(anchor)?;

        let in_range = match step.range {
            RangeClass::Melee => can_melee(bs, actor, anchor),
            RangeClass::Ranged => can_ranged(bs, actor, anchor),
            RangeClass::Any => true,
        };
        if !in_range {
            log.push(
                BattleEventKind::OutOfRange { index },
                format!(
                    "step {index} ({}) out of range: {actor} cannot reach {anchor}",
                    step.kind.label()
                ),
                bs.tick,
            );
            return Ok(None);
        }

        let targets: Vec<CombatantId> = match step.area {
            TargetArea::Single => vec![anchor.clone()],
            TargetArea::Group => {
                let anchor_state = bs.combatant(anchor)?;
                let team = anchor_state.team;
                members_of_group(bs, anchor_state.group_id)
                    .into_iter()
                    .filter(|id| bs.combatants.get(id).map_or(false, |c| c.team == team))
                    .collect()
            }
            TargetArea::All => bs.turn_order.clone(),
        };

        if targets.is_empty() {
            log.push(
                BattleEventKind::NoTargets { index },
                format!("step {index} ({}) found no targets", step.kind.label()),
                bs.tick,
            );
            return Ok(None);
        }
        Ok(Some(targets))
    }

    fn exec_attack(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        crit_stat: CritStat,
        targets: &[CombatantId],
        log: &mut EventLog,
    ) -> Result<i32> {
        let mut best = 0;
        for target in targets {
            let report = basic_attack(
                bs,
                &mut self.rng,
                actor,
                target,
                &IndexModifiers::default(),
                crit_stat,
            )?;
            let description = match report.outcome {
                AttackOutcome::Evade => format!("{actor} attacked {target}: evaded"),
                outcome => format!(
                    "{actor} attacked {target}: {outcome:?} for {} damage",
                    report.damage
                ),
            };
            log.push(
                BattleEventKind::AttackResolved {
                    attacker: actor.clone(),
                    defender: target.clone(),
                    outcome: report.outcome,
                    damage: report.damage,
                },
                description,
                bs.tick,
            );
            best = best.max(report.outcome.rank());
        }
        Ok(best)
    }

    fn exec_apply_effect(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        targets: &[CombatantId],
        effect: StatusId,
        duration_turns: u32,
        inflict: u32,
        log: &mut EventLog,
    ) -> Result<i32> {
        let mut any = false;
        for target in targets {
            let resist = compute_status_resist_index(&bs.def(target)?.stats, effect);

            let success = if !resist.resistible {
                log.push(
                    BattleEventKind::StatusChecked {
                        actor: actor.clone(),
                        target: target.clone(),
                        effect,
                        success: true,
                    },
                    format!("{actor} afflicted {target} with {effect:?}: no resistance possible"),
                    bs.tick,
                );
                true
            } else {
                let check = status_check(&mut self.rng, inflict, resist.value);
                log.push(
                    BattleEventKind::StatusChecked {
                        actor: actor.clone(),
                        target: target.clone(),
                        effect,
                        success: check.success,
                    },
                    format!(
                        "{actor} rolled {effect:?} on {target}: inflict {inflict} vs resist {} -> roll {} of {}",
                        resist.value, check.roll, check.total
                    ),
                    bs.tick,
                );
                check.success
            };

            if success {
                let ticks = turns_to_ticks_for_battle(bs, duration_turns);
                // Re-application stacks onto the remaining count
                let total = {
                    let entry = bs.combatant_mut(target)?.effects.entry(effect).or_insert(0);
                    *entry += ticks;
                    *entry
                };
                log.push(
                    BattleEventKind::EffectApplied {
                        target: target.clone(),
                        effect,
                        ticks,
                    },
                    format!("{target} gained {effect:?} for {ticks} ticks ({total} total)"),
                    bs.tick,
                );
                any = true;
            } else {
                log.push(
                    BattleEventKind::EffectResisted {
                        target: target.clone(),
                        effect,
                    },
                    format!("{target} resisted {effect:?}"),
                    bs.tick,
                );
            }
        }
        Ok(if any { 1 } else { 0 })
    }

    fn exec_remove_effect(
        &mut self,
        bs: &mut BattleState,
        actor: &CombatantId,
        targets: &[CombatantId],
        effect: StatusId,
        log: &mut EventLog,
    ) -> Result<i32> {
        let mut any = false;
        for target in targets {
            if !bs.combatant(target)?.effects.contains_key(&effect) {
                log.push(
                    BattleEventKind::DispelNoop {
                        target: target.clone(),
                        effect,
                    },
                    format!("{target} has no {effect:?} to remove"),
                    bs.tick,
                );
                continue;
            }

            let resist = compute_status_resist_index(&bs.def(target)?.stats, effect);
            if !resist.resistible {
                log.push(
                    BattleEventKind::DispelChecked {
                        actor: actor.clone(),
                        target: target.clone(),
                        effect,
                        retained: true,
                    },
                    format!("{effect:?} on {target} cannot be dispelled"),
                    bs.tick,
                );
                log.push(
                    BattleEventKind::DispelFailed {
                        target: target.clone(),
                        effect,
                    },
                    format!("{target} keeps {effect:?}"),
                    bs.tick,
                );
                continue;
            }

            // The roll reads inverted here: landing the status means it
            // holds on, failing to land means the dispel lifts it
            let check = status_check(&mut self.rng, DISPEL_INFLICT, resist.value);
            log.push(
                BattleEventKind::DispelChecked {
                    actor: actor.clone(),
                    target: target.clone(),
                    effect,
                    retained: check.success,
                },
                format!(
                    "{actor} rolled dispel of {effect:?} on {target}: {DISPEL_INFLICT} vs resist {} -> roll {} of {}",
                    resist.value, check.roll, check.total
                ),
                bs.tick,
            );
            if check.success {
                log.push(
                    BattleEventKind::DispelFailed {
                        target: target.clone(),
                        effect,
                    },
                    format!("{target} keeps {effect:?}"),
                    bs.tick,
                );
            } else {
                bs.combatant_mut(target)?.effects.remove(&effect);
                log.push(
                    BattleEventKind::EffectRemoved {
                        target: target.clone(),
                        effect,
                    },
                    format!("{target} lost {effect:?}"),
                    bs.tick,
                );
                any = true;
            }
        }
        Ok(if any { 1 } else { 0 })
    }

    fn exec_apply_modifier(
        &mut self,
        bs: &mut BattleState,
        targets: &[CombatantId],
        key: ModifierKey,
        delta: i32,
        duration_turns: u32,
        log: &mut EventLog,
    ) -> Result<i32> {
        let ticks = turns_to_ticks_for_battle(bs, duration_turns);
        for target in targets {
            // Always a fresh instance; stacking never merges
            let instance = ModifierInstance {
                id: ModifierId::new(),
                key,
                delta,
                ticks_left: ticks,
            };
            let id = instance.id;
            bs.combatant_mut(target)?.modifiers.push(instance);
            log.push(
                BattleEventKind::ModifierApplied {
                    target: target.clone(),
                    id,
                    key,
                    delta,
                    ticks,
                },
                format!("{target} gained {key:?} {delta:+} for {ticks} ticks"),
                bs.tick,
            );
        }
        Ok(if targets.is_empty() { 0 } else { 1 })
    }

    fn exec_hp_delta(
        &mut self,
        bs: &mut BattleState,
        targets: &[CombatantId],
        amount: i32,
        log: &mut EventLog,
    ) -> Result<i32> {
        for target in targets {
            let (before, after) = bs.combatant_mut(target)?.apply_hp_delta(amount);
            log.push(
                BattleEventKind::HpChanged {
                    target: target.clone(),
                    before,
                    after,
                },
                format!("{target} HP {before} -> {after} ({amount:+})"),
                bs.tick,
            );
        }
        Ok(1)
    }

    fn run_reactions(
        &mut self,
        bs: &mut BattleState,
        mover: &CombatantId,
        prev_group: GroupId,
        reaction_immune: bool,
        log: &mut EventLog,
    ) -> Result<()> {
        let candidates = reaction_candidates(bs, mover, prev_group, reaction_immune)?;
        if candidates.is_empty() {
            log.push(
                BattleEventKind::ReactionCandidates {
                    candidates: Vec::new(),
                },
                "no reaction attacks".to_string(),
                bs.tick,
            );
            return Ok(());
        }

        let names: Vec<&str> = candidates.iter().map(|c| c.0.as_str()).collect();
        log.push(
            BattleEventKind::ReactionCandidates {
                candidates: candidates.clone(),
            },
            format!("reaction attacks from: {}", names.join(", ")),
            bs.tick,
        );

        let results = execute_reaction_attacks(
            bs,
            &mut self.rng,
            mover,
            &candidates,
            self.config.reaction_hit_penalty,
        )?;
        for (attacker, report) in results {
            let description = match report.outcome {
                AttackOutcome::Evade => format!("{attacker} swung at {mover}: evaded"),
                outcome => format!(
                    "{attacker} swung at {mover}: {outcome:?} for {} damage",
                    report.damage
                ),
            };
            log.push(
                BattleEventKind::ReactionResolved {
                    attacker: attacker.clone(),
                    mover: mover.clone(),
                    outcome: report.outcome,
                    damage: report.damage,
                },
                description,
                bs.tick,
            );
        }
        Ok(())
    }

    fn note_battle_end(&self, bs: &mut BattleState, log: &mut EventLog) {
        if bs.ended {
            return;
        }
        if let Some(winner) = bs.winner() {
            bs.ended = true;
            let reason = match winner {
                Team::Ally => "every enemy is down",
                Team::Enemy => "every ally is down",
            };
            bs.end_reason = Some(reason.to_string());
            log.push(
                BattleEventKind::BattleEnded { winner },
                format!("battle ended: {reason}"),
                bs.tick,
            );
        }
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

/// One expire-and-compact pass over every duration-bearing entry
///
/// Entries are stored with at least one tick remaining, decrement by one
/// and are deleted the moment they reach zero.
fn decay_all(bs: &mut BattleState) {
    for st in bs.combatants.values_mut() {
        st.cooldowns.retain(|_, t| {
            *t = t.saturating_sub(1);
            *t > 0
        });
        st.effects.retain(|_, t| {
            *t = t.saturating_sub(1);
            *t > 0
        });
        st.modifiers.retain_mut(|m| {
            m.ticks_left = m.ticks_left.saturating_sub(1);
            m.ticks_left > 0
        });
    }
}
