//! AI action provider.

use async_trait::async_trait;
use combat_core::{BattleSnapshot, CombatAction, UnitId};

use super::{AiContext, decide};
use crate::api::{ActionProvider, Result, RuntimeError};

/// Provider backed by the greedy single-turn policy.
///
/// Registered for [`ProviderKind::Ai`](crate::ProviderKind::Ai) it drives the
/// enemies; bound to party members it acts as an auto-pilot.
#[derive(Debug, Clone, Default)]
pub struct AiProvider;

impl AiProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionProvider for AiProvider {
    async fn provide_action(
        &self,
        unit: UnitId,
        snapshot: &BattleSnapshot,
    ) -> Result<CombatAction> {
        let ctx = AiContext::new(unit, snapshot).ok_or_else(|| RuntimeError::Provider {
            unit,
            message: "unit missing from snapshot".into(),
        })?;

        let action = decide(&ctx);
        tracing::debug!(
            target: "runtime::ai",
            %unit,
            line = %ctx.unit.line,
            action = action.as_str(),
            "AI decided"
        );
        Ok(action)
    }
}
