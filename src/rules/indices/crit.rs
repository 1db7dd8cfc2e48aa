//! Attack grade index formulas
//!
//! The weak/strong/critical weights come from one of two coefficient
//! families. Strength-style attacks (STR or INT primary) trade weak hits
//! for strong ones as the attacker's tier rises. Agility-style attacks
//! (AGI or WIS primary) bring a secondary stat into the mix and scale
//! critical weight faster at high tiers.

use serde::{Deserialize, Serialize};

use crate::battle::character::Stats;
use crate::rules::constants::{BASE_CRIT, BASE_STRONG, BASE_WEAK};

/// Stat a skill resolves its attack grade with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CritStat {
    Str,
    Agi,
    Int,
    Wis,
}

/// Level-derived tier selecting the crit formula coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Junk,
    Common,
    Uncommon,
    Rare,
    Exotic,
    Legendary,
}

impl Rarity {
    /// Tier from attacker level: 1-3, 4-8, 9-12, 13-16, 17-19, 20+
    pub fn from_level(level: u32) -> Self {
        match level {
            0..=3 => Rarity::Junk,
            4..=8 => Rarity::Common,
            9..=12 => Rarity::Uncommon,
            13..=16 => Rarity::Rare,
            17..=19 => Rarity::Exotic,
            _ => Rarity::Legendary,
        }
    }
}

/// Weak/strong/critical index triple, ready to feed a crit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritIndices {
    pub weak: u32,
    pub strong: u32,
    pub critical: u32,
}

fn clamp_nonneg(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Strength-style coefficients; only the primary stat contributes
fn strength_family(rarity: Rarity, primary: f64) -> (f64, f64, f64) {
    let p = primary;
    match rarity {
        Rarity::Junk => (BASE_WEAK + (20.0 - p), BASE_STRONG + p / 2.0, BASE_CRIT),
        Rarity::Common => (BASE_WEAK + (17.0 - p), BASE_STRONG + p, BASE_CRIT + p / 5.0),
        Rarity::Uncommon => (
            BASE_WEAK + (14.0 - p),
            BASE_STRONG + p * 1.5,
            BASE_CRIT + p / 3.0,
        ),
        Rarity::Rare => (
            BASE_WEAK + (11.0 - p),
            BASE_STRONG + p * 2.0,
            BASE_CRIT + p / 2.0,
        ),
        Rarity::Exotic => (BASE_WEAK + (8.0 - p), BASE_STRONG + p * 3.0, BASE_CRIT + p),
        Rarity::Legendary => (
            BASE_WEAK + (5.0 - p),
            BASE_STRONG + p * 3.5,
            BASE_CRIT + p * 1.5,
        ),
    }
}

/// Agility-style coefficients; a secondary stat backs the primary
fn agility_family(rarity: Rarity, primary: f64, secondary: f64) -> (f64, f64, f64) {
    let (p, s) = (primary, secondary);
    match rarity {
        Rarity::Junk => (
            BASE_WEAK + (30.0 - p),
            BASE_STRONG + p / 2.0 + s / 4.0,
            BASE_CRIT,
        ),
        Rarity::Common => (
            BASE_WEAK + (27.0 - p),
            BASE_STRONG + p + s / 3.0,
            BASE_CRIT + p / 4.0 + s / 5.0,
        ),
        Rarity::Uncommon => (
            BASE_WEAK + (25.0 - p),
            BASE_STRONG + p * 1.5 + s / 2.0,
            BASE_CRIT + p / 2.0 + s / 5.0,
        ),
        Rarity::Rare => (
            BASE_WEAK + (23.0 - p),
            BASE_STRONG + p * 2.0 + s / 2.0,
            BASE_CRIT + p + s / 5.0,
        ),
        Rarity::Exotic => (
            BASE_WEAK + (20.0 - p),
            BASE_STRONG + p * 2.0 + s / 2.0,
            BASE_CRIT + p * 1.2 + s / 5.0,
        ),
        Rarity::Legendary => (
            BASE_WEAK + (18.0 - p),
            BASE_STRONG + p * 2.5 + s / 2.0,
            BASE_CRIT + p * 1.8 + s / 5.0,
        ),
    }
}

/// Compute the weak/strong/critical indices for one attacker
///
/// Family and stat selection:
/// - STR: strength family, primary STR
/// - INT: strength family, primary INT
/// - AGI: agility family, primary AGI, secondary STR
/// - WIS: agility family, primary WIS, secondary INT
///
/// Results are clamped at zero and truncated to integers.
pub fn compute_crit_indices(attacker_level: u32, stats: &Stats, crit_stat: CritStat) -> CritIndices {
    let rarity = Rarity::from_level(attacker_level);

    let (w, s, c) = match crit_stat {
        CritStat::Str => strength_family(rarity, stats.strength as f64),
        CritStat::Int => strength_family(rarity, stats.intelligence as f64),
        CritStat::Agi => agility_family(rarity, stats.agility as f64, stats.strength as f64),
        CritStat::Wis => agility_family(rarity, stats.wisdom as f64, stats.intelligence as f64),
    };

    CritIndices {
        weak: clamp_nonneg(w) as u32,
        strong: clamp_nonneg(s) as u32,
        critical: clamp_nonneg(c) as u32,
    }
}
