//! Asynchronous abstraction for sourcing unit intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so the battle can
//! run with human input, scripted fixtures, or the AI policy.
use async_trait::async_trait;
use combat_core::{BattleSnapshot, CombatAction, UnitId};

use super::errors::{Result, RuntimeError};

/// Trait for providing actions based on the current battle state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Enemy AI decisions
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for the given unit based on the current battle state.
    ///
    /// # Arguments
    /// * `unit` - The unit whose turn is open
    /// * `snapshot` - Read-only copy of the battle
    ///
    /// # Returns
    /// The action to submit, or an error if action cannot be determined
    async fn provide_action(&self, unit: UnitId, snapshot: &BattleSnapshot)
    -> Result<CombatAction>;
}

/// A simple action provider that always holds position.
/// Useful for testing or as a fallback.
pub struct HoldPositionProvider;

#[async_trait]
impl ActionProvider for HoldPositionProvider {
    async fn provide_action(
        &self,
        unit: UnitId,
        snapshot: &BattleSnapshot,
    ) -> Result<CombatAction> {
        let combatant = snapshot.unit(unit).ok_or_else(|| RuntimeError::Provider {
            unit,
            message: "unit missing from snapshot".into(),
        })?;
        Ok(CombatAction::hold(combatant))
    }
}
