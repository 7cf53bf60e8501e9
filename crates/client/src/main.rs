//! Wasteland battle client binary.
//!
//! Headless composition root: loads an encounter, assembles the runtime
//! with the AI fighting on both sides, and prints the battle log and report.
//!
//! # Examples
//!
//! ```bash
//! # bundled sample encounter
//! cargo run -p wasteland-client
//!
//! # custom rosters, fixed seed, JSON report
//! WASTELAND_PARTY=party.ron WASTELAND_ENEMIES=mutants.ron \
//!     WASTELAND_SEED=42 WASTELAND_JSON=true cargo run -p wasteland-client
//! ```
mod collaborators;
mod config;
mod logging;

use anyhow::{Context, Result};
use combat_content::{ConfigLoader, Encounter, bundled_data_dir};
use combat_core::CombatConfig;
use runtime::{AiProvider, ProviderKind, Runtime, RuntimeConfig};

use collaborators::{LoggingGrowth, LoggingLoot};
use config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    tracing::info!("Starting wasteland client");

    let encounter = load_encounter(&config)?;
    let combat = match &config.combat_config {
        Some(path) => ConfigLoader::load(path)?,
        None => CombatConfig::default(),
    };

    let runtime_config = RuntimeConfig {
        combat,
        settle_delay: config.settle_delay,
        seed: config.seed,
        ..RuntimeConfig::default()
    };

    // no interactive frontend: the party runs on auto-pilot
    let mut runtime = Runtime::builder()
        .config(runtime_config)
        .encounter(encounter)
        .provider(ProviderKind::Player, AiProvider::new())
        .provider(ProviderKind::Ai, AiProvider::new())
        .loot(LoggingLoot)
        .growth(LoggingGrowth)
        .build()
        .await
        .context("failed to start battle")?;

    let seed = runtime.seed();
    let report = runtime.run().await.context("battle failed")?;
    runtime.shutdown().await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("seed {seed}");
        for entry in &report.log {
            println!("{entry}");
        }
        println!(
            "{} after {} actions, {} downed ({} captive)",
            report.status,
            report.actions,
            report.loot_eligible.len(),
            report.captives().count()
        );
    }

    tracing::info!("Client shutdown complete");
    Ok(())
}

/// Rosters from the configured paths, the bundled sample for any path unset.
fn load_encounter(config: &ClientConfig) -> Result<Encounter> {
    if config.party.is_none() && config.enemies.is_none() {
        return Encounter::sample();
    }

    let rosters = bundled_data_dir().join("rosters");
    let party = config
        .party
        .clone()
        .unwrap_or_else(|| rosters.join("party.ron"));
    let enemies = config
        .enemies
        .clone()
        .unwrap_or_else(|| rosters.join("raiders.ron"));

    Encounter::load(&party, &enemies)
        .with_context(|| format!("failed to load {} / {}", party.display(), enemies.display()))
}
