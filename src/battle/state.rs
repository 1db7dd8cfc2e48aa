//! Complete battle state
//!
//! Created once by the engine, then mutated exclusively through engine
//! operations. Never copied or forked mid-battle; there is exactly one
//! live mutation path.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::character::CharacterDef;
use crate::battle::combatant::CombatantState;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, GroupId, Team, Tick};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub defs: AHashMap<CombatantId, CharacterDef>,
    pub combatants: AHashMap<CombatantId, CombatantState>,

    /// Fixed at creation; never re-sorted
    pub turn_order: Vec<CombatantId>,
    pub turn_index: usize,
    pub tick: Tick,

    /// Group id to ordered member list; empty groups are deleted on the
    /// spot, so every entry has at least one member
    pub groups: AHashMap<GroupId, Vec<CombatantId>>,

    pub ended: bool,
    pub end_reason: Option<String>,
}

impl BattleState {
    pub fn current_actor_id(&self) -> &CombatantId {
        &self.turn_order[self.turn_index]
    }

    pub fn current_actor(&self) -> &CombatantState {
        &self.combatants[self.current_actor_id()]
    }

    pub fn participant_count(&self) -> usize {
        self.turn_order.len()
    }

    pub fn combatant(&self, id: &CombatantId) -> Result<&CombatantState> {
        self.combatants
            .get(id)
            .ok_or_else(|| BattleError::UnknownCombatant(id.clone()))
    }

    pub fn combatant_mut(&mut self, id: &CombatantId) -> Result<&mut CombatantState> {
        self.combatants
            .get_mut(id)
            .ok_or_else(|| BattleError::UnknownCombatant(id.clone()))
    }

    pub fn def(&self, id: &CombatantId) -> Result<&CharacterDef> {
        self.defs
            .get(id)
            .ok_or_else(|| BattleError::UnknownCombatant(id.clone()))
    }

    /// Winning team, if exactly one side still has anyone standing
    pub fn winner(&self) -> Option<Team> {
        let standing = |team: Team| {
            self.combatants
                .values()
                .any(|c| c.team == team && !c.is_down())
        };
        match (standing(Team::Ally), standing(Team::Enemy)) {
            (true, false) => Some(Team::Ally),
            (false, true) => Some(Team::Enemy),
            _ => None,
        }
    }
}
