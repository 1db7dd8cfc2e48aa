//! Battle configuration with documented constants
//!
//! The seed groups every combatant starts in, plus the tuning knobs the
//! engine consults at runtime.

use crate::core::types::GroupId;

/// Configuration for a battle engine instance
///
/// The defaults reproduce the standard two-line opening: all allies in one
/// group, all enemies in another.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    /// Group every ally starts in at battle creation
    pub ally_group_id: GroupId,

    /// Group every enemy starts in at battle creation
    pub enemy_group_id: GroupId,

    /// Additive hit-index penalty applied to reaction attacks
    ///
    /// Reaction attackers swing at a retreating or repositioning target,
    /// so their hit index is reduced by this amount (floored at zero).
    pub reaction_hit_penalty: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            ally_group_id: GroupId(0),
            enemy_group_id: GroupId(1),
            reaction_hit_penalty: 5,
        }
    }
}
