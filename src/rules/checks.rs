//! Weighted-draw checks
//!
//! Every probabilistic decision in the engine reduces to one mechanism:
//! draw a uniform integer in [1, total] and map it to the outcome whose
//! cumulative-weight bucket contains it, first bucket inclusive. The RNG
//! handle is always passed in; there is no global randomness.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of a hit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    Hit,
    Evade,
}

/// Full record of a hit check, roll included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitCheck {
    pub outcome: HitOutcome,
    pub roll: u32,
    pub hit_index: u32,
    pub evade_index: u32,
    pub total: u32,
}

/// Roll hit vs evade over the two index weights
///
/// roll <= hit_index lands the hit; anything above evades. The indices
/// must not both be zero.
pub fn hit_check<R: Rng>(rng: &mut R, hit_index: u32, evade_index: u32) -> HitCheck {
    let total = hit_index + evade_index;
    assert!(total > 0, "hit_index + evade_index must be > 0");

    let roll = rng.gen_range(1..=total);
    let outcome = if roll <= hit_index {
        HitOutcome::Hit
    } else {
        HitOutcome::Evade
    };

    HitCheck {
        outcome,
        roll,
        hit_index,
        evade_index,
        total,
    }
}

/// Grade of a landed hit; there is no miss outcome at this stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackGrade {
    Weak,
    Strong,
    Critical,
}

/// Full record of a crit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritCheck {
    pub grade: AttackGrade,
    pub roll: u32,
    pub weak_index: u32,
    pub strong_index: u32,
    pub crit_index: u32,
    pub total: u32,
}

/// Roll the grade of a hit that already landed
///
/// Buckets in order: weak, strong, critical. The three indices must not
/// all be zero.
pub fn crit_check<R: Rng>(
    rng: &mut R,
    weak_index: u32,
    strong_index: u32,
    crit_index: u32,
) -> CritCheck {
    let total = weak_index + strong_index + crit_index;
    assert!(total > 0, "weak + strong + critical must be > 0");

    let roll = rng.gen_range(1..=total);
    let grade = if roll <= weak_index {
        AttackGrade::Weak
    } else if roll <= weak_index + strong_index {
        AttackGrade::Strong
    } else {
        AttackGrade::Critical
    };

    CritCheck {
        grade,
        roll,
        weak_index,
        strong_index,
        crit_index,
        total,
    }
}

/// Result of a status check
///
/// success means the status takes hold. Dispel callers invert the reading:
/// success there means the status survives the dispel attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCheck {
    pub success: bool,
    pub roll: u32,
    pub total: u32,
}

/// Roll infliction vs resistance over the two weights
pub fn status_check<R: Rng>(rng: &mut R, inflict: u32, resist: u32) -> StatusCheck {
    let total = inflict + resist;
    assert!(total > 0, "inflict + resist must be > 0");

    let roll = rng.gen_range(1..=total);
    StatusCheck {
        success: roll <= inflict,
        roll,
        total,
    }
}
