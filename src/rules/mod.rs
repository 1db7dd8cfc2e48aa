//! Resolution rules: indices, weighted draws and the attack pipeline
//!
//! Balance lives in `constants` and `indices`; `checks` owns the dice.
//! The battle engine composes these, it never rolls on its own.

pub mod basic_attack;
pub mod checks;
pub mod constants;
pub mod indices;

pub use basic_attack::{basic_attack, execute_reaction_attacks, AttackOutcome, AttackReport};
pub use checks::{
    crit_check, hit_check, status_check, AttackGrade, CritCheck, HitCheck, HitOutcome, StatusCheck,
};
pub use constants::*;
pub use indices::{
    compute_attack_indices, compute_crit_indices, compute_evade_index, compute_hit_index,
    compute_hit_indices, compute_status_resist_index, AttackIndices, CritIndices, CritStat,
    HitIndices, IndexModifiers, Rarity, ResistStat, StatusId, StatusResistIndex,
};
