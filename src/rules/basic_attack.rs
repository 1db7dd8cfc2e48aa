//! Basic attack resolution
//!
//! One pipeline serves plain attacks, skill attacks and reaction attacks:
//! compute indices, roll the hit check, roll the grade, apply table
//! damage. Skills differ only in the modifiers they pass in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::state::BattleState;
use crate::core::error::Result;
use crate::core::types::CombatantId;
use crate::rules::checks::{crit_check, hit_check, AttackGrade, HitOutcome};
use crate::rules::constants::{DAMAGE_CRITICAL, DAMAGE_STRONG, DAMAGE_WEAK};
use crate::rules::indices::{compute_attack_indices, CritStat, IndexModifiers};

/// Final outcome of one attack resolution, evasion included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Evade,
    Weak,
    Strong,
    Critical,
}

impl AttackOutcome {
    /// Integer rank used by chain gating: EVADE 0 through CRITICAL 3
    pub fn rank(self) -> i32 {
        match self {
            AttackOutcome::Evade => 0,
            AttackOutcome::Weak => 1,
            AttackOutcome::Strong => 2,
            AttackOutcome::Critical => 3,
        }
    }

    /// Table damage for this outcome
    pub fn damage(self) -> i32 {
        match self {
            AttackOutcome::Evade => 0,
            AttackOutcome::Weak => DAMAGE_WEAK,
            AttackOutcome::Strong => DAMAGE_STRONG,
            AttackOutcome::Critical => DAMAGE_CRITICAL,
        }
    }
}

impl From<AttackGrade> for AttackOutcome {
    fn from(grade: AttackGrade) -> Self {
        match grade {
            AttackGrade::Weak => AttackOutcome::Weak,
            AttackGrade::Strong => AttackOutcome::Strong,
            AttackGrade::Critical => AttackOutcome::Critical,
        }
    }
}

/// What one attack did to the defender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub outcome: AttackOutcome,
    pub damage: i32,
}

/// Resolve a single attack and apply its damage
pub fn basic_attack<R: Rng>(
    bs: &mut BattleState,
    rng: &mut R,
    attacker: &CombatantId,
    defender: &CombatantId,
    modifiers: &IndexModifiers,
    crit_stat: CritStat,
) -> Result<AttackReport> {
    let indices = {
        let atk = bs.def(attacker)?;
        let dfn = bs.def(defender)?;
        compute_attack_indices(atk, dfn, crit_stat, modifiers)
    };

    let hit = hit_check(rng, indices.hit_eva.hit, indices.hit_eva.evade);
    if hit.outcome == HitOutcome::Evade {
        return Ok(AttackReport {
            outcome: AttackOutcome::Evade,
            damage: 0,
        });
    }

    let crit = crit_check(
        rng,
        indices.crit.weak,
        indices.crit.strong,
        indices.crit.critical,
    );
    let outcome = AttackOutcome::from(crit.grade);
    let damage = outcome.damage();

    bs.combatant_mut(defender)?.apply_hp_delta(-damage);

    Ok(AttackReport { outcome, damage })
}

/// Run the reaction attacks a movement provoked, in candidate order
///
/// Each candidate swings at the mover through the normal attack pipeline
/// with the configured hit penalty applied.
pub fn execute_reaction_attacks<R: Rng>(
    bs: &mut BattleState,
    rng: &mut R,
    mover: &CombatantId,
    candidates: &[CombatantId],
    reaction_hit_penalty: i32,
) -> Result<Vec<(CombatantId, AttackReport)>> {
    let modifiers = IndexModifiers {
        hit: -reaction_hit_penalty,
        ..Default::default()
    };

    let mut results = Vec::with_capacity(candidates.len());
    for attacker in candidates {
        let report = basic_attack(bs, rng, attacker, mover, &modifiers, CritStat::Str)?;
        results.push((attacker.clone(), report));
    }
    Ok(results)
}
