//! Mutable per-battle combatant state
//!
//! HP is private and clamped on every write; downed-ness is derived from
//! it, never stored. Cooldowns, effects and modifiers all count down on
//! the shared tick clock.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{CombatantId, GroupId, SkillId, Team};
use crate::rules::indices::StatusId;

/// Keys a modifier instance can adjust
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Weak,
    Strong,
    Critical,
    Hit,
    Evade,
    StatusResist,
    StatusInflict,
    Str,
    Agi,
    Con,
    Int,
    Wis,
}

/// Unique identifier for modifier instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierId(pub Uuid);

impl ModifierId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModifierId {
    fn default() -> Self {
        Self::new()
    }
}

/// One stacked numeric adjustment with its own countdown
///
/// Re-applying the same key/delta never merges or extends an existing
/// instance; it always appends a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierInstance {
    pub id: ModifierId,
    pub key: ModifierKey,
    pub delta: i32,
    pub ticks_left: u32,
}

/// Everything about one combatant that changes during a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantState {
    pub id: CombatantId,
    pub team: Team,
    pub max_hp: i32,
    hp: i32,
    pub group_id: GroupId,

    pub main_available: bool,
    pub sub_available: bool,

    pub cooldowns: AHashMap<SkillId, u32>,
    pub effects: AHashMap<StatusId, u32>,
    pub modifiers: Vec<ModifierInstance>,
    pub flags: AHashSet<String>,
}

impl CombatantState {
    pub fn new(id: CombatantId, team: Team, max_hp: i32, group_id: GroupId) -> Self {
        Self {
            id,
            team,
            max_hp,
            hp: max_hp.max(0),
            group_id,
            main_available: true,
            sub_available: true,
            cooldowns: AHashMap::new(),
            effects: AHashMap::new(),
            modifiers: Vec::new(),
            flags: AHashSet::new(),
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Write HP, clamped into [0, max_hp]
    pub fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.max_hp);
    }

    /// Add a signed delta to HP and return (before, after)
    pub fn apply_hp_delta(&mut self, delta: i32) -> (i32, i32) {
        let before = self.hp;
        self.set_hp(before.saturating_add(delta));
        (before, self.hp)
    }

    /// Down means exactly zero HP; there is no separate flag
    pub fn is_down(&self) -> bool {
        self.hp == 0
    }

    /// Sum of active modifier deltas for one key
    ///
    /// The index pipeline takes explicit modifiers; callers that want
    /// stacked instances to count fold this total into what they pass.
    pub fn modifier_total(&self, key: ModifierKey) -> i32 {
        self.modifiers
            .iter()
            .filter(|m| m.key == key)
            .map(|m| m.delta)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(max_hp: i32) -> CombatantState {
        CombatantState::new(CombatantId::from("A1"), Team::Ally, max_hp, GroupId(0))
    }

    #[test]
    fn test_hp_clamps_both_ends() {
        let mut st = combatant(30);
        st.set_hp(100);
        assert_eq!(st.hp(), 30);
        st.set_hp(-5);
        assert_eq!(st.hp(), 0);
    }

    #[test]
    fn test_is_down_tracks_hp_exactly() {
        let mut st = combatant(10);
        assert!(!st.is_down());
        st.apply_hp_delta(-10);
        assert!(st.is_down());
        st.apply_hp_delta(1);
        assert!(!st.is_down());
    }

    #[test]
    fn test_apply_hp_delta_reports_before_and_after() {
        let mut st = combatant(20);
        let (before, after) = st.apply_hp_delta(-25);
        assert_eq!((before, after), (20, 0));
        let (before, after) = st.apply_hp_delta(7);
        assert_eq!((before, after), (0, 7));
    }

    #[test]
    fn test_modifier_instances_never_merge() {
        let mut st = combatant(20);
        for _ in 0..2 {
            st.modifiers.push(ModifierInstance {
                id: ModifierId::new(),
                key: ModifierKey::Hit,
                delta: -10,
                ticks_left: 5,
            });
        }
        assert_eq!(st.modifiers.len(), 2);
        assert_ne!(st.modifiers[0].id, st.modifiers[1].id);
        assert_eq!(st.modifier_total(ModifierKey::Hit), -20);
        assert_eq!(st.modifier_total(ModifierKey::Evade), 0);
    }
}
