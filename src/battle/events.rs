//! Typed battle event log
//!
//! Every public engine operation returns an ordered log of what happened.
//! Each event pairs a machine-readable kind with a human-readable
//! description; reporting sinks consume the descriptions, tests match on
//! the kinds.

use serde::{Deserialize, Serialize};

use crate::battle::combatant::{ModifierId, ModifierKey};
use crate::core::types::{ActionSlot, CombatantId, GroupId, SkillId, Team, Tick};
use crate::rules::basic_attack::AttackOutcome;
use crate::rules::indices::StatusId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventKind {
    SlotConsumed {
        actor: CombatantId,
        slot: ActionSlot,
    },
    TurnSkipped {
        actor: CombatantId,
    },
    Engaged {
        actor: CombatantId,
        target: CombatantId,
    },
    Disengaged {
        actor: CombatantId,
        group: GroupId,
    },
    AttackResolved {
        attacker: CombatantId,
        defender: CombatantId,
        outcome: AttackOutcome,
        damage: i32,
    },
    ReactionCandidates {
        candidates: Vec<CombatantId>,
    },
    ReactionResolved {
        attacker: CombatantId,
        mover: CombatantId,
        outcome: AttackOutcome,
        damage: i32,
    },
    StatusChecked {
        actor: CombatantId,
        target: CombatantId,
        effect: StatusId,
        success: bool,
    },
    EffectApplied {
        target: CombatantId,
        effect: StatusId,
        ticks: u32,
    },
    EffectResisted {
        target: CombatantId,
        effect: StatusId,
    },
    DispelChecked {
        actor: CombatantId,
        target: CombatantId,
        effect: StatusId,
        retained: bool,
    },
    EffectRemoved {
        target: CombatantId,
        effect: StatusId,
    },
    DispelFailed {
        target: CombatantId,
        effect: StatusId,
    },
    DispelNoop {
        target: CombatantId,
        effect: StatusId,
    },
    ModifierApplied {
        target: CombatantId,
        id: ModifierId,
        key: ModifierKey,
        delta: i32,
        ticks: u32,
    },
    HpChanged {
        target: CombatantId,
        before: i32,
        after: i32,
    },
    CooldownSet {
        actor: CombatantId,
        skill: SkillId,
        ticks: u32,
    },
    StepSkipped {
        index: usize,
    },
    ChainBroken {
        index: usize,
    },
    OutOfRange {
        index: usize,
    },
    NoTargets {
        index: usize,
    },
    TurnEnded {
        next: CombatantId,
    },
    BattleEnded {
        winner: Team,
    },
}

/// One logged occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub kind: BattleEventKind,
    pub description: String,
}

/// Ordered events from a single engine call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BattleEventKind, description: String, tick: Tick) {
        self.events.push(BattleEvent {
            tick,
            kind,
            description,
        });
    }

    /// The human-readable lines, in order
    pub fn descriptions(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.description.as_str()).collect()
    }

    /// Does any event satisfy the predicate?
    pub fn any<F: Fn(&BattleEventKind) -> bool>(&self, pred: F) -> bool {
        self.events.iter().any(|e| pred(&e.kind))
    }
}
