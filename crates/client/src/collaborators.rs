//! Collaborators that record a finished battle in the log.
use async_trait::async_trait;
use combat_core::{BattleReport, CombatUnit, UnitStatus};
use runtime::{GrowthCollaborator, LootCollaborator};

/// Logs downed enemies; captives are the unconscious ones.
pub struct LoggingLoot;

#[async_trait]
impl LootCollaborator for LoggingLoot {
    async fn collect(&self, downed: &[CombatUnit]) -> runtime::Result<()> {
        for unit in downed {
            let fate = if unit.status == UnitStatus::Unconscious {
                "captive"
            } else {
                "loot"
            };
            tracing::info!(
                target: "client::loot",
                unit = %unit.id,
                template = %unit.template_id,
                fate,
                "Enemy downed"
            );
        }
        Ok(())
    }
}

/// Logs per-unit combat metrics.
pub struct LoggingGrowth;

#[async_trait]
impl GrowthCollaborator for LoggingGrowth {
    async fn record(&self, report: &BattleReport) -> runtime::Result<()> {
        for (unit, metrics) in &report.metrics {
            tracing::info!(
                target: "client::growth",
                %unit,
                kills = metrics.kills,
                melee_damage = metrics.melee.damage,
                ranged_damage = metrics.ranged.damage,
                damage_taken = metrics.defense.damage_taken,
                "Combat metrics"
            );
        }
        Ok(())
    }
}
