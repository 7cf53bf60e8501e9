//! Hit and crit odds.

use crate::config::HitChanceParams;

/// Hit chance in percent.
///
/// ```text
/// hit_chance = base + (skill - evasion)
/// clamped to [min, max]
/// ```
///
/// An inverted window (`min > max`) resolves to `max`.
pub fn hit_chance(skill: u32, evasion: u32, params: &HitChanceParams) -> u32 {
    let stat_diff = skill as i64 - evasion as i64;
    let chance = params.base as i64 + stat_diff;
    chance.max(params.min as i64).min(params.max as i64) as u32
}

/// Crit chance in percent, clamped to `[0, 100]`.
pub fn crit_chance(crit_stat: u32) -> u32 {
    crit_stat.min(100)
}
