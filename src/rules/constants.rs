//! Balance constants
//!
//! Every tunable number in the resolution rules lives here so balance
//! passes touch one file.

/// Base hit index before the attacker's level is added
pub const HIT_BASE: i32 = 40;

/// Baseline contributions shared by every crit formula family
pub const BASE_WEAK: f64 = 20.0;
pub const BASE_STRONG: f64 = 0.0;
pub const BASE_CRIT: f64 = 0.0;

/// Fixed inflict weight used by every dispel check
///
/// Dispel ignores whatever inflict weight the caller supplied for the
/// original infliction and rolls against this constant instead.
pub const DISPEL_INFLICT: u32 = 20;

/// Damage dealt per attack grade
pub const DAMAGE_WEAK: i32 = 1;
pub const DAMAGE_STRONG: i32 = 3;
pub const DAMAGE_CRITICAL: i32 = 9;
