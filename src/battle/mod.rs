//! Battle system - turn-based combat between two rosters
//!
//! The engine decides whose turn it is, what actions they may take, how
//! actions probabilistically resolve and how time-limited effects decay.
//! Targeting depends on formation, resolution depends on the rules
//! indices, chaining depends on resolution results, and everything
//! advances on the same tick clock.

pub mod character;
pub mod combatant;
pub mod engine;
pub mod events;
pub mod formation;
pub mod initiative;
pub mod reactions;
pub mod skill;
pub mod state;
pub mod timebase;

// Re-exports for convenient access
pub use character::{CharacterDef, Stats};
pub use combatant::{CombatantState, ModifierId, ModifierInstance, ModifierKey};
pub use engine::BattleEngine;
pub use events::{BattleEvent, BattleEventKind, EventLog};
pub use formation::{
    can_melee, can_ranged, disengage, engage, members_of_group, same_group,
};
pub use initiative::compute_turn_order;
pub use reactions::reaction_candidates;
pub use skill::{RangeClass, Skill, Step, StepKind, TargetArea};
pub use state::BattleState;
pub use timebase::{
    ticks_to_turns, ticks_to_turns_for_battle, turns_to_ticks, turns_to_ticks_for_battle,
};
