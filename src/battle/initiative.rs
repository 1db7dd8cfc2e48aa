//! Turn order computation
//!
//! Computed once at battle creation and never re-sorted afterwards.

use std::cmp::Reverse;

use ahash::AHashMap;

use crate::battle::character::CharacterDef;
use crate::core::types::CombatantId;

/// Initiative: AGI desc, then WIS desc, then level desc, then id asc
///
/// The id tiebreak makes the order a total one, so recomputing from the
/// same definitions always yields the same permutation.
pub fn compute_turn_order(defs: &AHashMap<CombatantId, CharacterDef>) -> Vec<CombatantId> {
    let mut order: Vec<CombatantId> = defs.keys().cloned().collect();
    order.sort_by_key(|id| {
        let d = &defs[id];
        (
            Reverse(d.stats.agility),
            Reverse(d.stats.wisdom),
            Reverse(d.level),
            id.clone(),
        )
    });
    order
}
