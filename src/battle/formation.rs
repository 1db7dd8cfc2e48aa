//! Dynamic formation groups
//!
//! Groups are flat membership lists. Sharing a group is what makes melee
//! legal; being in different groups is what makes ranged legal. Movement
//! between groups is the engage/disengage pair below.

use crate::battle::state::BattleState;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, GroupId};

/// Do two combatants currently share a group?
pub fn same_group(bs: &BattleState, a: &CombatantId, b: &CombatantId) -> bool {
    match (bs.combatants.get(a), bs.combatants.get(b)) {
        (Some(x), Some(y)) => x.group_id == y.group_id,
        _ => false,
    }
}

/// Melee reaches only inside the attacker's own group
pub fn can_melee(bs: &BattleState, attacker: &CombatantId, target: &CombatantId) -> bool {
    same_group(bs, attacker, target)
}

/// Ranged reaches only across group boundaries
pub fn can_ranged(bs: &BattleState, attacker: &CombatantId, target: &CombatantId) -> bool {
    bs.combatants.contains_key(attacker)
        && bs.combatants.contains_key(target)
        && !same_group(bs, attacker, target)
}

/// Ordered members of a group; empty if the group does not exist
pub fn members_of_group(bs: &BattleState, group: GroupId) -> Vec<CombatantId> {
    bs.groups.get(&group).cloned().unwrap_or_default()
}

/// Highest existing group id plus one, or zero on an empty map
fn next_group_id(bs: &BattleState) -> GroupId {
    bs.groups
        .keys()
        .map(|g| g.0)
        .max()
        .map(|max| GroupId(max + 1))
        .unwrap_or(GroupId(0))
}

fn remove_member(bs: &mut BattleState, group: GroupId, id: &CombatantId) -> Result<()> {
    let members = bs
        .groups
        .get_mut(&group)
        .ok_or(BattleError::GroupNotFound(group))?;

    let index = members
        .iter()
        .position(|m| m == id)
        .ok_or_else(|| BattleError::NotInGroup {
            combatant: id.clone(),
            group,
        })?;
    members.remove(index);

    // A group entry dies the instant it empties
    if members.is_empty() {
        bs.groups.remove(&group);
    }
    Ok(())
}

fn add_member(bs: &mut BattleState, group: GroupId, id: &CombatantId) -> Result<()> {
    let members = bs.groups.entry(group).or_default();
    if members.contains(id) {
        return Err(BattleError::AlreadyInGroup {
            combatant: id.clone(),
            group,
        });
    }
    members.push(id.clone());
    Ok(())
}

/// Move the actor into the target's group
///
/// A no-op when the two already share a group. Self-engagement is a
/// caller error.
pub fn engage(bs: &mut BattleState, actor: &CombatantId, target: &CombatantId) -> Result<()> {
    if actor == target {
        return Err(BattleError::EngageSelf(actor.clone()));
    }

    let actor_gid = bs.combatant(actor)?.group_id;
    let target_gid = bs.combatant(target)?.group_id;
    if actor_gid == target_gid {
        return Ok(());
    }

    remove_member(bs, actor_gid, actor)?;
    add_member(bs, target_gid, actor)?;
    bs.combatant_mut(actor)?.group_id = target_gid;
    Ok(())
}

/// Step the actor back into a fresh group of their own
///
/// Returns the newly allocated group id.
pub fn disengage(bs: &mut BattleState, actor: &CombatantId) -> Result<GroupId> {
    let old_gid = bs.combatant(actor)?.group_id;
    let new_gid = next_group_id(bs);

    remove_member(bs, old_gid, actor)?;
    add_member(bs, new_gid, actor)?;
    bs.combatant_mut(actor)?.group_id = new_gid;
    Ok(new_gid)
}
