//! Deterministic rules of wasteland turn-based combat.
//!
//! The crate is pure: no I/O, no clocks and no global randomness. Callers own
//! a [`CombatEngine`] per battle and drive it turn by turn; the `runtime`
//! crate wraps it in an async worker.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod metrics;
pub mod scheduler;
pub mod state;

pub use combat::{
    AttackForecast, AttackRollResult, RollOutcome, adjusted_damage_range, armor_reduction,
    crit_chance, forecast, hit_chance, resolve, total_damage,
};
pub use config::{CombatConfig, HitChanceParams};
pub use engine::{
    ActionError, ActionOutcome, ActionReceipt, ActionStart, Applied, AttackApplied,
    BattleLogEntry, BattleReport, BattleSnapshot, CombatAction, CombatEngine, EngineError,
    TurnError,
};
pub use env::{Dice, FixedRng, PcgRng, RngOracle, SequenceRng, compute_seed};
pub use error::{CombatError, ErrorContext, ErrorSeverity};
pub use metrics::{CharacterCombatMetrics, CombatResult, CombatStatus, DefenseStats, OffenseStats};
pub use scheduler::{InitiativeItem, InitiativeQueue, delay_offset, turn_cadence};
pub use state::{
    ArmorPiece, CombatUnit, DamageRange, Equipment, Faction, Gadget, InvalidLine, Line,
    LineOccupancy, Rarity, Side, TurnTime, UnitId, UnitStats, UnitStatus, Weapon, WeaponCategory,
    WeaponSlot,
};
