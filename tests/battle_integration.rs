//! Battle engine integration tests
//!
//! End-to-end coverage of the turn machine, the skill pipeline with chain
//! gating and targeting, formation movement with reaction attacks, and
//! duration decay. Probabilistic outcomes are pinned down by searching
//! seeds, then re-running the found seed deterministically.

use ashenfield::battle::{
    ticks_to_turns_for_battle, BattleEngine, BattleEventKind, BattleState, CharacterDef,
    ModifierKey, RangeClass, Skill, Stats, Step, StepKind, TargetArea,
};
use ashenfield::core::types::{ActionSlot, AttackRange, CombatantId, GroupId, SkillId, Team};
use ashenfield::core::{BattleConfig, BattleError};
use ashenfield::rules::indices::{CritStat, StatusId};

fn mk(id: &str, level: u32, agi: i32, wis: i32, max_hp: i32) -> CharacterDef {
    let stats = Stats {
        agility: agi,
        wisdom: wis,
        ..Stats::uniform(10)
    };
    CharacterDef::new(id, id, level, stats, max_hp)
}

/// 1v1 with A1 fast enough to always open
fn battle_1v1(seed: u64) -> (BattleEngine, BattleState, CombatantId, CombatantId) {
    let engine = BattleEngine::with_seed(BattleConfig::default(), seed);
    let bs = engine
        .create_battle(&[mk("A1", 10, 20, 10, 50)], &[mk("E1", 10, 5, 10, 50)])
        .unwrap();
    let (a1, e1) = (CombatantId::from("A1"), CombatantId::from("E1"));
    assert_eq!(bs.current_actor_id(), &a1);
    (engine, bs, a1, e1)
}

/// End the current actor's turn and the opponent's, back to the opener
fn advance_full_round(engine: &mut BattleEngine, bs: &mut BattleState) {
    engine.end_turn(bs);
    engine.end_turn(bs);
}

fn attack_then_bleed(a1: &CombatantId, e1: &CombatantId) -> Skill {
    Skill::new(
        "attack_then_bleed",
        "Attack then Bleed",
        a1.clone(),
        ActionSlot::Main,
        vec![
            Step::attack(e1.clone()),
            Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 30).gated(1),
            Step::apply_modifier(e1.clone(), ModifierKey::Hit, -10, 2).gated(1),
        ],
    )
}

fn evaded(log: &ashenfield::battle::EventLog) -> bool {
    log.any(|k| {
        matches!(
            k,
            BattleEventKind::AttackResolved {
                outcome: ashenfield::rules::AttackOutcome::Evade,
                ..
            }
        )
    })
}

// ----------------- chain gating -----------------

#[test]
fn test_chain_breaks_when_attack_evades() {
    // Find a seed where the opening attack evades, then verify that the
    // gated follow-up steps never ran.
    let mut found = None;
    for seed in 0..2000 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let log = engine
            .apply_skill(&mut bs, &attack_then_bleed(&a1, &e1))
            .unwrap();
        if evaded(&log) {
            found = Some((log, bs));
            break;
        }
    }
    let (log, bs) = found.expect("no evading seed in range");
    let e1 = CombatantId::from("E1");

    assert!(log.any(|k| matches!(k, BattleEventKind::StepSkipped { index: 1 })));
    assert!(log.any(|k| matches!(k, BattleEventKind::ChainBroken { index: 1 })));
    // Neither the effect nor the modifier landed
    let target = bs.combatant(&e1).unwrap();
    assert!(!target.effects.contains_key(&StatusId::Bleeding));
    assert!(target.modifiers.is_empty());
}

#[test]
fn test_chain_continues_when_attack_lands() {
    let mut found = None;
    for seed in 0..2000 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let log = engine
            .apply_skill(&mut bs, &attack_then_bleed(&a1, &e1))
            .unwrap();
        if !evaded(&log) {
            found = Some(log);
            break;
        }
    }
    let log = found.expect("no landing seed in range");

    // The gated effect step actually rolled
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::StatusChecked {
            effect: StatusId::Bleeding,
            ..
        }
    )));
    assert!(!log.any(|k| matches!(k, BattleEventKind::StepSkipped { index: 1 })));
}

#[test]
fn test_status_success_gates_modifier() {
    let skill_of = |a1: &CombatantId, e1: &CombatantId| {
        Skill::new(
            "bleed_then_mod",
            "Bleed then Mod",
            a1.clone(),
            ActionSlot::Sub,
            vec![
                Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 1),
                Step::apply_modifier(e1.clone(), ModifierKey::Weak, -10, 2).gated(1),
            ],
        )
    };

    let mut success = None;
    let mut failure = None;
    for seed in 0..3000 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let log = engine.apply_skill(&mut bs, &skill_of(&a1, &e1)).unwrap();
        let applied = log.any(|k| matches!(k, BattleEventKind::EffectApplied { .. }));
        let resisted = log.any(|k| matches!(k, BattleEventKind::EffectResisted { .. }));
        if applied && success.is_none() {
            success = Some(bs);
        } else if resisted && failure.is_none() {
            failure = Some((log, bs));
        }
        if success.is_some() && failure.is_some() {
            break;
        }
    }

    let bs = success.expect("no success seed in range");
    assert_eq!(bs.combatant(&CombatantId::from("E1")).unwrap().modifiers.len(), 1);

    let (log, bs) = failure.expect("no failure seed in range");
    assert!(bs.combatant(&CombatantId::from("E1")).unwrap().modifiers.is_empty());
    assert!(log.any(|k| matches!(k, BattleEventKind::ChainBroken { .. })));
}

#[test]
fn test_attack_rank_observable_through_gate_thresholds() {
    // HP deltas fire only past STRONG (rank 2) and CRITICAL (rank 3)
    let skill_of = |a1: &CombatantId, e1: &CombatantId| {
        Skill::new(
            "rank_gate",
            "Rank Gate",
            a1.clone(),
            ActionSlot::Main,
            vec![
                Step::attack(e1.clone()),
                Step::apply_hp_delta(e1.clone(), -1).gated(2),
                Step::attack(e1.clone()),
                Step::apply_hp_delta(e1.clone(), -1).gated(3),
            ],
        )
    };

    let mut strong_seed = None;
    let mut crit_seed = None;
    for seed in 0..20000 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let log = engine.apply_skill(&mut bs, &skill_of(&a1, &e1)).unwrap();
        let hp_deltas = log
            .events
            .iter()
            .filter(|e| matches!(e.kind, BattleEventKind::HpChanged { .. }))
            .count();
        if hp_deltas >= 1 && strong_seed.is_none() {
            strong_seed = Some(seed);
        }
        if hp_deltas >= 2 && crit_seed.is_none() {
            crit_seed = Some(seed);
        }
        if strong_seed.is_some() && crit_seed.is_some() {
            break;
        }
    }
    assert!(strong_seed.is_some(), "no seed reached the STRONG gate");
    assert!(crit_seed.is_some(), "no seed reached the CRITICAL gate");
}

#[test]
fn test_chain_break_does_not_roll_back_earlier_steps() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(42);
    let skill = Skill::new(
        "hurt_then_gate",
        "Hurt then Gate",
        a1.clone(),
        ActionSlot::Main,
        vec![
            Step::apply_hp_delta(e1.clone(), -3),
            // Impossible gate: always breaks the chain
            Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 30).gated(99),
        ],
    );
    let log = engine.apply_skill(&mut bs, &skill).unwrap();

    assert!(log.any(|k| matches!(k, BattleEventKind::ChainBroken { .. })));
    // The first step's damage stays applied
    assert_eq!(bs.combatant(&e1).unwrap().hp(), 47);
}

// ----------------- cooldowns -----------------

#[test]
fn test_skill_cooldown_blocks_next_own_turn_then_clears() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(123);
    let skill = Skill::new(
        "cooldown_test",
        "Cooldown Test",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::attack(e1.clone())],
    )
    .with_cooldown(1);

    // First use succeeds and registers: 1 turn * 2 participants + 1 = 3 ticks
    let log = engine.apply_skill(&mut bs, &skill).unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::CooldownSet { ticks: 3, .. })));
    let stored = bs.combatant(&a1).unwrap().cooldowns[&skill.id];
    assert_eq!(stored, 3);
    // Reported back in turns, the +1 offset disappears
    assert_eq!(ticks_to_turns_for_battle(&bs, stored), 1);

    // Back to A1 with one tick still left
    advance_full_round(&mut engine, &mut bs);
    assert_eq!(bs.current_actor_id(), &a1);
    match engine.apply_skill(&mut bs, &skill) {
        Err(BattleError::SkillOnCooldown { ticks_left, .. }) => assert_eq!(ticks_left, 1),
        other => panic!("expected cooldown violation, got {other:?}"),
    }

    // One more round clears it
    advance_full_round(&mut engine, &mut bs);
    assert!(engine.apply_skill(&mut bs, &skill).is_ok());
}

#[test]
fn test_cooldown_registers_even_when_chain_breaks() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(5);
    let skill = Skill::new(
        "broken_chain_cd",
        "Broken Chain",
        a1.clone(),
        ActionSlot::Main,
        vec![
            Step::apply_hp_delta(e1.clone(), -1),
            Step::apply_hp_delta(e1.clone(), -1).gated(99),
        ],
    )
    .with_cooldown(2);

    let log = engine.apply_skill(&mut bs, &skill).unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::ChainBroken { .. })));
    assert!(log.any(|k| matches!(k, BattleEventKind::CooldownSet { .. })));
    assert_eq!(bs.combatant(&a1).unwrap().cooldowns[&skill.id], 5);
}

// ----------------- effects and modifiers over time -----------------

#[test]
fn test_effect_duration_two_turns_two_participants_is_five_ticks() {
    // Overwhelming inflict so the roll all but always lands
    let mut found = None;
    for seed in 0..50 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let skill = Skill::new(
            "bleed",
            "Bleed",
            a1.clone(),
            ActionSlot::Main,
            vec![Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 1000)],
        );
        let log = engine.apply_skill(&mut bs, &skill).unwrap();
        if log.any(|k| matches!(k, BattleEventKind::EffectApplied { .. })) {
            found = Some((engine, bs));
            break;
        }
    }
    let (mut engine, mut bs) = found.expect("infliction never landed");
    let e1 = CombatantId::from("E1");
    assert_eq!(bs.combatant(&e1).unwrap().effects[&StatusId::Bleeding], 5);

    for _ in 0..4 {
        engine.end_turn(&mut bs);
    }
    assert_eq!(bs.combatant(&e1).unwrap().effects[&StatusId::Bleeding], 1);
    engine.end_turn(&mut bs);
    assert!(!bs.combatant(&e1).unwrap().effects.contains_key(&StatusId::Bleeding));
}

#[test]
fn test_effect_reapplication_sums_remaining_ticks() {
    let mut found = None;
    for seed in 0..200 {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let skill = Skill::new(
            "double_bleed",
            "Double Bleed",
            a1.clone(),
            ActionSlot::Main,
            vec![
                Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 1000),
                Step::apply_effect(e1.clone(), StatusId::Bleeding, 2, 1000),
            ],
        );
        let log = engine.apply_skill(&mut bs, &skill).unwrap();
        let applied = log
            .events
            .iter()
            .filter(|e| matches!(e.kind, BattleEventKind::EffectApplied { .. }))
            .count();
        if applied == 2 {
            found = Some(bs);
            break;
        }
    }
    let bs = found.expect("double infliction never landed");
    let e1 = CombatantId::from("E1");
    // 5 ticks per application, summed rather than reset
    assert_eq!(bs.combatant(&e1).unwrap().effects[&StatusId::Bleeding], 10);
}

#[test]
fn test_modifier_reapplication_stacks_instances() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(9);
    let skill = Skill::new(
        "double_mod",
        "Double Mod",
        a1.clone(),
        ActionSlot::Main,
        vec![
            Step::apply_modifier(e1.clone(), ModifierKey::Hit, -10, 2),
            Step::apply_modifier(e1.clone(), ModifierKey::Hit, -10, 2),
        ],
    );
    engine.apply_skill(&mut bs, &skill).unwrap();

    let target = bs.combatant(&e1).unwrap();
    assert_eq!(target.modifiers.len(), 2);
    assert_ne!(target.modifiers[0].id, target.modifiers[1].id);
    assert!(target.modifiers.iter().all(|m| m.ticks_left == 5));
    assert_eq!(target.modifier_total(ModifierKey::Hit), -20);

    // Both instances expire together after five ticks
    for _ in 0..5 {
        engine.end_turn(&mut bs);
    }
    assert!(bs.combatant(&e1).unwrap().modifiers.is_empty());
}

#[test]
fn test_tick_bookkeeping_decrements_by_one_per_end_turn() {
    let (mut engine, mut bs, a1, _) = battle_1v1(3);
    let key = SkillId::from("x");
    let st = bs.combatant_mut(&a1).unwrap();
    st.cooldowns.insert(key.clone(), 4);
    st.effects.insert(StatusId::Slow, 6);

    for k in 1..=3u32 {
        engine.end_turn(&mut bs);
        let st = bs.combatant(&a1).unwrap();
        assert_eq!(st.cooldowns[&key], 4 - k);
        assert_eq!(st.effects[&StatusId::Slow], 6 - k);
    }
    engine.end_turn(&mut bs);
    let st = bs.combatant(&a1).unwrap();
    assert!(!st.cooldowns.contains_key(&key));
    assert_eq!(st.effects[&StatusId::Slow], 2);
}

// ----------------- dispel -----------------

#[test]
fn test_dispel_against_zero_resist_always_fails() {
    // With the fixed dispel weight of 20 and a resist of zero, the roll
    // always lands in the inflict bucket, which reads as "the status
    // holds on". No seed can remove it.
    for seed in 0..30 {
        let engine = BattleEngine::with_seed(BattleConfig::default(), seed);
        let helpless = CharacterDef::new("E1", "E1", 10, Stats::uniform(0), 50);
        let mut bs = engine
            .create_battle(&[mk("A1", 10, 20, 10, 50)], &[helpless])
            .unwrap();
        let (a1, e1) = (CombatantId::from("A1"), CombatantId::from("E1"));
        bs.combatant_mut(&e1)
            .unwrap()
            .effects
            .insert(StatusId::Bleeding, 100);

        let mut engine = engine;
        let skill = Skill::new(
            "cleanse",
            "Cleanse",
            a1.clone(),
            ActionSlot::Main,
            vec![Step::remove_effect(e1.clone(), StatusId::Bleeding)],
        );
        let log = engine.apply_skill(&mut bs, &skill).unwrap();

        assert!(log.any(|k| matches!(k, BattleEventKind::DispelFailed { .. })));
        assert!(!log.any(|k| matches!(k, BattleEventKind::EffectRemoved { .. })));
        assert!(bs.combatant(&e1).unwrap().effects.contains_key(&StatusId::Bleeding));
    }
}

#[test]
fn test_dispel_against_huge_resist_usually_succeeds() {
    // Same fixed weight of 20 against a massive resist: the status
    // almost never holds, so some early seed removes it.
    let mut removed = false;
    for seed in 0..50 {
        let engine = BattleEngine::with_seed(BattleConfig::default(), seed);
        let tank = CharacterDef::new("E1", "E1", 10, Stats::uniform(1000), 50);
        let mut bs = engine
            .create_battle(&[mk("A1", 10, 20, 10, 50)], &[tank])
            .unwrap();
        let (a1, e1) = (CombatantId::from("A1"), CombatantId::from("E1"));
        bs.combatant_mut(&e1)
            .unwrap()
            .effects
            .insert(StatusId::Bleeding, 100);

        let mut engine = engine;
        let skill = Skill::new(
            "cleanse",
            "Cleanse",
            a1.clone(),
            ActionSlot::Main,
            vec![Step::remove_effect(e1.clone(), StatusId::Bleeding)],
        );
        let log = engine.apply_skill(&mut bs, &skill).unwrap();
        if log.any(|k| matches!(k, BattleEventKind::EffectRemoved { .. })) {
            assert!(!bs.combatant(&e1).unwrap().effects.contains_key(&StatusId::Bleeding));
            removed = true;
            break;
        }
    }
    assert!(removed, "dispel never succeeded against trivial retention odds");
}

#[test]
fn test_dispel_of_missing_effect_is_a_noop() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(8);
    let skill = Skill::new(
        "cleanse",
        "Cleanse",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::remove_effect(e1.clone(), StatusId::Curse)],
    );
    let log = engine.apply_skill(&mut bs, &skill).unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::DispelNoop { .. })));
}

#[test]
fn test_unresistible_status_auto_applies_and_never_dispels() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(77);
    let doom = Skill::new(
        "doom",
        "Doom",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::apply_effect(e1.clone(), StatusId::InstantDeath, 1, 0)],
    );
    let log = engine.apply_skill(&mut bs, &doom).unwrap();
    // No roll happened; it simply landed
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::StatusChecked {
            effect: StatusId::InstantDeath,
            success: true,
            ..
        }
    )));
    assert!(bs.combatant(&e1).unwrap().effects.contains_key(&StatusId::InstantDeath));

    engine.end_turn(&mut bs);
    let cleanse = Skill::new(
        "cleanse",
        "Cleanse",
        e1.clone(),
        ActionSlot::Main,
        vec![Step::remove_effect(e1.clone(), StatusId::InstantDeath)],
    );
    let log = engine.apply_skill(&mut bs, &cleanse).unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::DispelFailed { .. })));
    assert!(bs.combatant(&e1).unwrap().effects.contains_key(&StatusId::InstantDeath));
}

// ----------------- formation and reactions -----------------

fn melee_ranged_battle(seed: u64) -> (BattleEngine, BattleState) {
    let engine = BattleEngine::with_seed(BattleConfig::default(), seed);
    let bs = engine
        .create_battle(
            &[mk("A1", 10, 20, 10, 50)],
            &[
                mk("E1", 10, 5, 10, 50),
                mk("E2", 10, 3, 10, 50).with_range(AttackRange::Ranged),
            ],
        )
        .unwrap();
    (engine, bs)
}

#[test]
fn test_disengage_provokes_melee_reactions_only() {
    let (mut engine, mut bs) = melee_ranged_battle(11);
    let a1 = CombatantId::from("A1");
    let e1 = CombatantId::from("E1");

    // Main: close in. The previous group held only allies, so no reactions.
    let close = Skill::new(
        "close",
        "Close In",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::engage(e1.clone())],
    );
    let log = engine.apply_skill(&mut bs, &close).unwrap();
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::ReactionCandidates { candidates } if candidates.is_empty()
    )));
    assert_eq!(bs.combatant(&a1).unwrap().group_id, GroupId(1));

    // Sub: back out. Only the melee enemy reacts; the ranged one cannot.
    let fall_back = Skill::new(
        "fall_back",
        "Fall Back",
        a1.clone(),
        ActionSlot::Sub,
        vec![Step::disengage()],
    );
    let log = engine.apply_skill(&mut bs, &fall_back).unwrap();
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::ReactionCandidates { candidates } if candidates == &vec![e1.clone()]
    )));
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::ReactionResolved { attacker, mover, .. }
            if attacker == &e1 && mover == &a1
    )));
}

#[test]
fn test_reaction_immune_movement_provokes_nothing() {
    let (mut engine, mut bs) = melee_ranged_battle(12);
    let a1 = CombatantId::from("A1");
    let e1 = CombatantId::from("E1");

    let close = Skill::new(
        "close",
        "Close In",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::engage(e1.clone())],
    );
    engine.apply_skill(&mut bs, &close).unwrap();

    let slip_away = Skill::new(
        "slip_away",
        "Slip Away",
        a1.clone(),
        ActionSlot::Sub,
        vec![Step::disengage().immune_to_reactions()],
    );
    let log = engine.apply_skill(&mut bs, &slip_away).unwrap();
    assert!(!log.any(|k| matches!(k, BattleEventKind::ReactionResolved { .. })));
}

#[test]
fn test_downed_combatants_do_not_react() {
    let (mut engine, mut bs) = melee_ranged_battle(13);
    let a1 = CombatantId::from("A1");
    let e1 = CombatantId::from("E1");
    bs.combatant_mut(&e1).unwrap().set_hp(0);

    let close = Skill::new(
        "close",
        "Close In",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::engage(e1.clone())],
    );
    engine.apply_skill(&mut bs, &close).unwrap();

    let fall_back = Skill::new(
        "fall_back",
        "Fall Back",
        a1.clone(),
        ActionSlot::Sub,
        vec![Step::disengage()],
    );
    let log = engine.apply_skill(&mut bs, &fall_back).unwrap();
    assert!(!log.any(|k| matches!(k, BattleEventKind::ReactionResolved { .. })));
}

#[test]
fn test_disengaging_last_member_deletes_the_group() {
    let (mut engine, mut bs, a1, _) = battle_1v1(21);
    assert!(bs.groups.contains_key(&GroupId(0)));

    let fall_back = Skill::new(
        "fall_back",
        "Fall Back",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::disengage()],
    );
    engine.apply_skill(&mut bs, &fall_back).unwrap();

    // Old singleton group is gone; the new id is max existing + 1
    assert!(!bs.groups.contains_key(&GroupId(0)));
    assert_eq!(bs.groups[&GroupId(2)], vec![a1.clone()]);
    assert_eq!(bs.combatant(&a1).unwrap().group_id, GroupId(2));
}

// ----------------- targeting -----------------

#[test]
fn test_group_area_hits_every_same_team_member_of_anchor_group() {
    let (mut engine, mut bs) = melee_ranged_battle(31);
    let a1 = CombatantId::from("A1");
    let e1 = CombatantId::from("E1");

    let volley = Skill::new(
        "volley",
        "Volley",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::attack(e1.clone())
            .with_range(RangeClass::Ranged)
            .with_area(TargetArea::Group)],
    );
    let log = engine.apply_skill(&mut bs, &volley).unwrap();
    let attacks = log
        .events
        .iter()
        .filter(|e| matches!(e.kind, BattleEventKind::AttackResolved { .. }))
        .count();
    assert_eq!(attacks, 2);
}

#[test]
fn test_all_area_needs_no_anchor_and_reaches_everyone() {
    let (mut engine, mut bs) = melee_ranged_battle(32);
    let a1 = CombatantId::from("A1");

    let quake = Skill::new(
        "quake",
        "Quake",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::new(StepKind::ApplyHpDelta { amount: -2 }).with_area(TargetArea::All)],
    );
    let log = engine.apply_skill(&mut bs, &quake).unwrap();
    let hits = log
        .events
        .iter()
        .filter(|e| matches!(e.kind, BattleEventKind::HpChanged { .. }))
        .count();
    assert_eq!(hits, 3);
    assert_eq!(bs.combatant(&a1).unwrap().hp(), 48);
}

#[test]
fn test_hp_delta_clamps_at_max_hp() {
    let (mut engine, mut bs, a1, _) = battle_1v1(33);
    bs.combatant_mut(&a1).unwrap().set_hp(10);

    let mend = Skill::new(
        "mend",
        "Mend",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::apply_hp_delta(a1.clone(), 999)],
    );
    let log = engine.apply_skill(&mut bs, &mend).unwrap();
    assert_eq!(bs.combatant(&a1).unwrap().hp(), 50);
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::HpChanged {
            before: 10,
            after: 50,
            ..
        }
    )));
}

#[test]
fn test_ranged_attack_blocked_inside_own_group() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(34);

    let close = Skill::new(
        "close",
        "Close In",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::engage(e1.clone())],
    );
    engine.apply_skill(&mut bs, &close).unwrap();

    let shoot = Skill::new(
        "shoot",
        "Shoot",
        a1.clone(),
        ActionSlot::Sub,
        vec![Step::attack(e1.clone()).with_range(RangeClass::Ranged)],
    );
    let log = engine.apply_skill(&mut bs, &shoot).unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::OutOfRange { .. })));
    assert!(!log.any(|k| matches!(k, BattleEventKind::AttackResolved { .. })));
}

// ----------------- raw steps and battle end -----------------

#[test]
fn test_raw_steps_share_the_skill_pipeline() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(55);

    let steps = [Step::attack(e1.clone())];
    let log = engine
        .apply_steps(&mut bs, &a1, ActionSlot::Main, CritStat::Str, &steps)
        .unwrap();
    assert!(log.any(|k| matches!(k, BattleEventKind::SlotConsumed { .. })));
    assert!(log.any(|k| matches!(k, BattleEventKind::AttackResolved { .. })));

    // The slot really is spent
    let again = engine.apply_steps(&mut bs, &a1, ActionSlot::Main, CritStat::Str, &steps);
    assert!(matches!(again, Err(BattleError::SlotAlreadyUsed { .. })));
}

#[test]
fn test_battle_ends_when_one_side_is_wiped() {
    let (mut engine, mut bs, a1, e1) = battle_1v1(66);
    let finisher = Skill::new(
        "finisher",
        "Finisher",
        a1.clone(),
        ActionSlot::Main,
        vec![Step::apply_hp_delta(e1.clone(), -999)],
    );
    let log = engine.apply_skill(&mut bs, &finisher).unwrap();

    assert!(bs.ended);
    assert_eq!(bs.winner(), Some(Team::Ally));
    assert!(bs.end_reason.is_some());
    assert!(log.any(|k| matches!(
        k,
        BattleEventKind::BattleEnded {
            winner: Team::Ally
        }
    )));
}

#[test]
fn test_same_seed_reproduces_the_same_trace() {
    let run = |seed: u64| {
        let (mut engine, mut bs, a1, e1) = battle_1v1(seed);
        let mut lines = Vec::new();
        for _ in 0..4 {
            let skill = attack_then_bleed(&a1, &e1);
            if let Ok(log) = engine.apply_skill(&mut bs, &skill) {
                lines.extend(log.descriptions().iter().map(|s| s.to_string()));
            }
            lines.extend(
                engine
                    .end_turn(&mut bs)
                    .descriptions()
                    .iter()
                    .map(|s| s.to_string()),
            );
            lines.extend(
                engine
                    .end_turn(&mut bs)
                    .descriptions()
                    .iter()
                    .map(|s| s.to_string()),
            );
        }
        lines
    };
    assert_eq!(run(90), run(90));
    assert_ne!(run(90), run(91));
}
