use thiserror::Error;

use crate::core::types::{ActionSlot, CombatantId, GroupId, SkillId};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Not {0}'s turn")]
    OutOfTurn(CombatantId),

    #[error("{slot:?} action already used this turn by {actor}")]
    SlotAlreadyUsed { actor: CombatantId, slot: ActionSlot },

    #[error("Skill on cooldown: {skill} ({ticks_left} ticks left)")]
    SkillOnCooldown { skill: SkillId, ticks_left: u32 },

    #[error("Duplicate combatant id: {0}")]
    DuplicateCombatant(CombatantId),

    #[error("Unknown combatant: {0}")]
    UnknownCombatant(CombatantId),

    #[error("Battle needs at least one combatant")]
    EmptyRoster,

    #[error("Step {index} requires a target anchor")]
    MissingAnchor { index: usize },

    #[error("Group {0} does not exist")]
    GroupNotFound(GroupId),

    #[error("{combatant} is not in group {group}")]
    NotInGroup {
        combatant: CombatantId,
        group: GroupId,
    },

    #[error("{combatant} is already in group {group}")]
    AlreadyInGroup {
        combatant: CombatantId,
        group: GroupId,
    },

    #[error("Cannot engage self: {0}")]
    EngageSelf(CombatantId),
}

pub type Result<T> = std::result::Result<T, BattleError>;
