//! Skill and step command types
//!
//! A skill is the unit the engine executes: one actor, one action slot,
//! an optional cooldown, and an ordered list of steps. Each step is one
//! atomic effect with its own targeting and a chain gate against the
//! previous step's result.

use serde::{Deserialize, Serialize};

use crate::battle::combatant::ModifierKey;
use crate::core::types::{ActionSlot, CombatantId, SkillId};
use crate::rules::indices::{CritStat, StatusId};

/// Group relationship a step demands between actor and anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeClass {
    /// Actor and anchor must share a group
    Melee,
    /// Actor and anchor must be in different groups
    Ranged,
    /// No group restriction
    #[default]
    Any,
}

/// How far a step's effect spreads from its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetArea {
    /// The anchor only
    #[default]
    Single,
    /// Every member of the anchor's group on the anchor's team
    Group,
    /// Every combatant in the battle; needs no anchor
    All,
}

/// The atomic effects a step can carry
///
/// Payloads ride on the variant, so a step can never be missing a field
/// its kind requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    /// Join the anchor's group; may provoke reaction attacks
    MoveEngage,
    /// Back out into a fresh group; may provoke reaction attacks
    MoveDisengage,
    /// One basic-attack resolution per resolved target
    Attack,
    /// Attempt status infliction on each resolved target
    ApplyEffect {
        effect: StatusId,
        duration_turns: u32,
        inflict: u32,
    },
    /// Attempt dispel on each resolved target holding the effect
    RemoveEffect { effect: StatusId },
    /// Append a modifier instance to each resolved target
    ApplyModifier {
        key: ModifierKey,
        delta: i32,
        duration_turns: u32,
    },
    /// Immediately add a signed HP delta to each resolved target
    ApplyHpDelta { amount: i32 },
}

impl StepKind {
    /// Short label for events and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::MoveEngage => "MoveEngage",
            StepKind::MoveDisengage => "MoveDisengage",
            StepKind::Attack => "Attack",
            StepKind::ApplyEffect { .. } => "ApplyEffect",
            StepKind::RemoveEffect { .. } => "RemoveEffect",
            StepKind::ApplyModifier { .. } => "ApplyModifier",
            StepKind::ApplyHpDelta { .. } => "ApplyHpDelta",
        }
    }
}

/// One micro-action inside a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,

    /// Explicit target the area expands from; optional only for
    /// all-area steps
    pub anchor: Option<CombatantId>,

    pub range: RangeClass,
    pub area: TargetArea,

    /// Chain gate: the previous step's result must be at least this for
    /// the step to run. The running result starts at 1, so ungated first
    /// steps always run.
    pub require_prev_gte: i32,

    /// Movement only: suppress reaction attacks for this step
    pub reaction_immune: bool,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            anchor: None,
            range: RangeClass::default(),
            area: TargetArea::default(),
            require_prev_gte: 0,
            reaction_immune: false,
        }
    }

    pub fn engage(target: impl Into<CombatantId>) -> Self {
        Self::new(StepKind::MoveEngage).with_anchor(target)
    }

    pub fn disengage() -> Self {
        Self::new(StepKind::MoveDisengage)
    }

    pub fn attack(target: impl Into<CombatantId>) -> Self {
        Self::new(StepKind::Attack).with_anchor(target)
    }

    pub fn apply_effect(
        target: impl Into<CombatantId>,
        effect: StatusId,
        duration_turns: u32,
        inflict: u32,
    ) -> Self {
        Self::new(StepKind::ApplyEffect {
            effect,
            duration_turns,
            inflict,
        })
        .with_anchor(target)
    }

    pub fn remove_effect(target: impl Into<CombatantId>, effect: StatusId) -> Self {
        Self::new(StepKind::RemoveEffect { effect }).with_anchor(target)
    }

    pub fn apply_modifier(
        target: impl Into<CombatantId>,
        key: ModifierKey,
        delta: i32,
        duration_turns: u32,
    ) -> Self {
        Self::new(StepKind::ApplyModifier {
            key,
            delta,
            duration_turns,
        })
        .with_anchor(target)
    }

    pub fn apply_hp_delta(target: impl Into<CombatantId>, amount: i32) -> Self {
        Self::new(StepKind::ApplyHpDelta { amount }).with_anchor(target)
    }

    pub fn with_anchor(mut self, anchor: impl Into<CombatantId>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_range(mut self, range: RangeClass) -> Self {
        self.range = range;
        self
    }

    pub fn with_area(mut self, area: TargetArea) -> Self {
        self.area = area;
        self
    }

    /// Gate this step on the previous step's result
    pub fn gated(mut self, threshold: i32) -> Self {
        self.require_prev_gte = threshold;
        self
    }

    pub fn immune_to_reactions(mut self) -> Self {
        self.reaction_immune = true;
        self
    }
}

/// An actor-bound, slot-consuming, optionally cooldown-bearing sequence
/// of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub actor: CombatantId,
    pub slot: ActionSlot,

    /// Cooldown in turns; zero declares no cooldown
    pub cooldown_turns: u32,

    /// Stat the attack grade resolves with for this skill's attacks
    pub crit_stat: CritStat,

    pub steps: Vec<Step>,
}

impl Skill {
    pub fn new(
        id: impl Into<SkillId>,
        name: impl Into<String>,
        actor: impl Into<CombatantId>,
        slot: ActionSlot,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            actor: actor.into(),
            slot,
            cooldown_turns: 0,
            crit_stat: CritStat::Str,
            steps,
        }
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    pub fn with_crit_stat(mut self, crit_stat: CritStat) -> Self {
        self.crit_stat = crit_stat;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder_defaults() {
        let step = Step::attack("E1");
        assert_eq!(step.range, RangeClass::Any);
        assert_eq!(step.area, TargetArea::Single);
        assert_eq!(step.require_prev_gte, 0);
        assert!(!step.reaction_immune);
        assert_eq!(step.anchor, Some(CombatantId::from("E1")));
    }

    #[test]
    fn test_gated_step() {
        let step = Step::apply_hp_delta("E1", -1).gated(2);
        assert_eq!(step.require_prev_gte, 2);
    }

    #[test]
    fn test_skill_defaults() {
        let skill = Skill::new("s1", "Strike", "A1", ActionSlot::Main, vec![Step::attack("E1")]);
        assert_eq!(skill.cooldown_turns, 0);
        assert_eq!(skill.crit_stat, CritStat::Str);
    }
}
