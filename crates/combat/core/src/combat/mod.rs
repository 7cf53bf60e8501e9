//! Attack forecasting and resolution.
//!
//! Everything here is a pure function of its inputs:
//!
//! - [`forecast`] prices an attack (legality, odds, damage, delay) without
//!   rolling anything
//! - [`resolve`] turns a forecast into concrete swings using injected dice
//!
//! State mutation happens later, in the engine's outcome applicator.

pub mod damage;
pub mod forecast;
pub mod hit;
pub mod resolve;

pub use damage::{adjusted_damage_range, armor_reduction};
pub use forecast::{AttackForecast, forecast};
pub use hit::{crit_chance, hit_chance};
pub use resolve::{AttackRollResult, RollOutcome, resolve, total_damage};
