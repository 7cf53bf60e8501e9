//! Data-driven battle content and loaders.
//!
//! This crate turns RON/TOML data files into the plain records the combat
//! engine consumes:
//! - Party and enemy rosters (RON, `Vec<CombatUnit>`)
//! - Combat tuning (TOML, `CombatConfig`)
//!
//! Rosters arrive fully resolved; nothing here applies equipment or trait
//! modifiers.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, Encounter, LoadResult, RosterLoader};

/// Directory holding the sample data shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
