//! Status conditions and resistance index formulas

use serde::{Deserialize, Serialize};

use crate::battle::character::Stats;

/// Closed set of status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusId {
    Bleeding,
    Poisoned,
    Burned,
    Frostbite,
    Stun,
    Confusion,
    Fear,
    Corruption,
    Curse,
    Weakness,
    Decay,
    Bind,
    Blind,
    Slow,
    Paralysis,
    InstantDeath,
    Frozen,
    Oblivion,
}

/// Auxiliary stat backing a status resistance roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResistStat {
    Str,
    Agi,
    Int,
    Wis,
}

impl ResistStat {
    fn value(self, stats: &Stats) -> i32 {
        match self {
            ResistStat::Str => stats.strength,
            ResistStat::Agi => stats.agility,
            ResistStat::Int => stats.intelligence,
            ResistStat::Wis => stats.wisdom,
        }
    }
}

impl StatusId {
    /// Auxiliary stat for the resistance formula, if any
    pub fn resist_stat(self) -> Option<ResistStat> {
        match self {
            StatusId::Bleeding => Some(ResistStat::Str),
            StatusId::Poisoned => None,
            StatusId::Burned => None,
            StatusId::Frostbite => None,
            StatusId::Stun => Some(ResistStat::Str),
            StatusId::Confusion => Some(ResistStat::Wis),
            StatusId::Fear => Some(ResistStat::Int),
            StatusId::Corruption => None,
            StatusId::Curse => Some(ResistStat::Int),
            StatusId::Weakness => Some(ResistStat::Str),
            StatusId::Decay => Some(ResistStat::Wis),
            StatusId::Bind => Some(ResistStat::Str),
            StatusId::Blind => Some(ResistStat::Int),
            StatusId::Slow => Some(ResistStat::Agi),
            StatusId::Paralysis => Some(ResistStat::Str),
            StatusId::InstantDeath => None,
            StatusId::Frozen => None,
            StatusId::Oblivion => Some(ResistStat::Int),
        }
    }

    /// Whether this status admits a resistance roll at all
    ///
    /// A non-resistible status lands automatically and can never be
    /// dispelled.
    pub fn resistible(self) -> bool {
        !matches!(self, StatusId::InstantDeath)
    }
}

/// Resistance index for one defender against one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResistIndex {
    pub value: u32,
    pub resistible: bool,
}

/// Compute the resistance index for a status
///
/// resist = CON + aux/2 (truncated), or CON + CON/2 when the status has no
/// auxiliary stat. Non-resistible statuses carry no index.
pub fn compute_status_resist_index(stats: &Stats, status: StatusId) -> StatusResistIndex {
    if !status.resistible() {
        return StatusResistIndex {
            value: 0,
            resistible: false,
        };
    }

    let con = stats.constitution;
    let value = match status.resist_stat() {
        Some(aux) => con + aux.value(stats) / 2,
        None => con + con / 2,
    };

    StatusResistIndex {
        value: value.max(0) as u32,
        resistible: true,
    }
}
