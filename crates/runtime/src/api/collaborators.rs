//! Outbound collaborators that consume a finished battle.
//!
//! Both run once per battle, after the engine froze its report. Failures are
//! logged by the worker and never change the battle outcome.
use async_trait::async_trait;
use combat_core::{BattleReport, CombatUnit};

use super::errors::Result;

/// Turns downed enemies into loot or captives.
#[async_trait]
pub trait LootCollaborator: Send + Sync {
    /// `downed` holds every enemy that ended the battle dead or unconscious.
    async fn collect(&self, downed: &[CombatUnit]) -> Result<()>;
}

/// Converts combat performance into character growth.
#[async_trait]
pub trait GrowthCollaborator: Send + Sync {
    async fn record(&self, report: &BattleReport) -> Result<()>;
}
