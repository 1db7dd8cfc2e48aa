//! Unified entry point for attack index computation
//!
//! The concrete formulas live in the sibling modules; this facade stacks
//! caller-supplied additive modifiers on top of the base indices and clamps
//! every final index at zero.

use serde::{Deserialize, Serialize};

use crate::battle::character::CharacterDef;
use crate::rules::indices::crit::{compute_crit_indices, CritIndices, CritStat};
use crate::rules::indices::hit::{compute_hit_indices, HitIndices};

/// Additive index adjustments supplied by a skill or situation
///
/// A plain basic attack passes the default (all zero). Reaction attacks
/// pass a negative hit adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexModifiers {
    pub hit: i32,
    pub evade: i32,
    pub weak: i32,
    pub strong: i32,
    pub critical: i32,
}

/// Final index set for one attack resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackIndices {
    pub hit_eva: HitIndices,
    pub crit: CritIndices,
}

fn apply_mod(base: u32, delta: i32) -> u32 {
    (base as i64 + delta as i64).max(0) as u32
}

/// Compute the full index set for an attack, base formulas plus modifiers
pub fn compute_attack_indices(
    attacker: &CharacterDef,
    defender: &CharacterDef,
    crit_stat: CritStat,
    modifiers: &IndexModifiers,
) -> AttackIndices {
    let base_he = compute_hit_indices(attacker.level, &defender.stats);
    let base_crit = compute_crit_indices(attacker.level, &attacker.stats, crit_stat);

    AttackIndices {
        hit_eva: HitIndices {
            hit: apply_mod(base_he.hit, modifiers.hit),
            evade: apply_mod(base_he.evade, modifiers.evade),
        },
        crit: CritIndices {
            weak: apply_mod(base_crit.weak, modifiers.weak),
            strong: apply_mod(base_crit.strong, modifiers.strong),
            critical: apply_mod(base_crit.critical, modifiers.critical),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::Stats;

    fn def(level: u32, stats: Stats) -> CharacterDef {
        CharacterDef::new("X", "X", level, stats, 30)
    }

    #[test]
    fn test_modifiers_are_additive() {
        let attacker = def(10, Stats::uniform(10));
        let defender = def(10, Stats::uniform(10));

        let base = compute_attack_indices(
            &attacker,
            &defender,
            CritStat::Str,
            &IndexModifiers::default(),
        );
        let boosted = compute_attack_indices(
            &attacker,
            &defender,
            CritStat::Str,
            &IndexModifiers {
                hit: 5,
                weak: -3,
                ..Default::default()
            },
        );

        assert_eq!(boosted.hit_eva.hit, base.hit_eva.hit + 5);
        assert_eq!(boosted.crit.weak, base.crit.weak - 3);
        assert_eq!(boosted.crit.strong, base.crit.strong);
    }

    #[test]
    fn test_final_index_clamps_at_zero() {
        let attacker = def(1, Stats::uniform(5));
        let defender = def(1, Stats::uniform(5));

        let floored = compute_attack_indices(
            &attacker,
            &defender,
            CritStat::Str,
            &IndexModifiers {
                hit: -1000,
                evade: -1000,
                ..Default::default()
            },
        );
        assert_eq!(floored.hit_eva.hit, 0);
        assert_eq!(floored.hit_eva.evade, 0);
    }
}
