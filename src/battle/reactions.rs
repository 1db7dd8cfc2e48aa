//! Reaction attack candidate derivation
//!
//! Moving out of contact invites a parting blow. Candidates come from the
//! group the mover stood in immediately before the move; the execution of
//! the attacks themselves lives in the rules module.

use crate::battle::state::BattleState;
use crate::core::error::Result;
use crate::core::types::{AttackRange, CombatantId, GroupId};

/// Who gets a reaction attack against a mover
///
/// From the mover's previous group, keep enemies who are still standing
/// and whose innate basic attack is melee. Order follows the group member
/// list. An immune move yields nobody.
pub fn reaction_candidates(
    bs: &BattleState,
    mover: &CombatantId,
    prev_group: GroupId,
    reaction_immune: bool,
) -> Result<Vec<CombatantId>> {
    if reaction_immune {
        return Ok(Vec::new());
    }

    let mover_team = bs.combatant(mover)?.team;

    let mut candidates = Vec::new();
    for id in bs.groups.get(&prev_group).into_iter().flatten() {
        if id == mover {
            continue;
        }
        let st = bs.combatant(id)?;
        if st.is_down() || st.team == mover_team {
            continue;
        }
        if bs.def(id)?.basic_attack_range != AttackRange::Melee {
            continue;
        }
        candidates.push(id.clone());
    }

    Ok(candidates)
}
