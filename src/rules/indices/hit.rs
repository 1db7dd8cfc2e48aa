//! Hit and evade index formulas

use crate::battle::character::Stats;
use crate::rules::constants::HIT_BASE;

/// Hit/evade index pair, ready to feed a hit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitIndices {
    pub hit: u32,
    pub evade: u32,
}

/// Attacker hit index: HIT_BASE + level
pub fn compute_hit_index(attacker_level: u32) -> u32 {
    HIT_BASE as u32 + attacker_level
}

/// Defender evade index from AGI and WIS: floor((2 * hi + lo) / 3)
///
/// The higher of the two stats is weighted double, so a defender is only
/// as evasive as their better reflex stat allows, dragged down a little
/// by the weaker one. Truncating division keeps the index an integer.
pub fn compute_evade_index(stats: &Stats) -> u32 {
    let (hi, lo) = if stats.agility >= stats.wisdom {
        (stats.agility, stats.wisdom)
    } else {
        (stats.wisdom, stats.agility)
    };
    ((2 * hi + lo) / 3).max(0) as u32
}

/// Final index pair for a hit check between one attacker and one defender
pub fn compute_hit_indices(attacker_level: u32, defender_stats: &Stats) -> HitIndices {
    HitIndices {
        hit: compute_hit_index(attacker_level),
        evade: compute_evade_index(defender_stats),
    }
}
