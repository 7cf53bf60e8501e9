//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive a battle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use combat_content::Encounter;
use combat_core::{
    BattleReport, CombatAction, CombatConfig, CombatEngine, CombatStatus, CombatUnit, PcgRng,
    RngOracle, UnitId,
};

use crate::api::{
    ActionProvider, GrowthCollaborator, LootCollaborator, ProviderKind, ProviderRegistry, Result,
    RuntimeError, RuntimeHandle, Submission, TurnContext, TurnPrompt,
};
use crate::events::{Event, EventBus, LifecycleEvent, Topic};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// How long an accepted action stays in flight before it is applied.
    pub settle_delay: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Battle seed; drawn from the thread RNG when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            settle_delay: Duration::ZERO,
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
        }
    }
}

/// Result of a single [`Runtime::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Acted { unit: UnitId, submission: Submission },
    Finished(CombatStatus),
}

/// Main runtime that orchestrates a battle
///
/// Design: Runtime owns the worker and the providers.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    providers: ProviderRegistry,
    seed: u64,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    /// Execute a single turn step
    ///
    /// Asks the active unit's provider for an action and submits it. An
    /// action the engine refuses as invalid is replaced by holding position
    /// so a faulty provider cannot stall the battle.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let context = match self.handle.next_turn().await? {
            TurnPrompt::Finished(status) => return Ok(StepOutcome::Finished(status)),
            TurnPrompt::Active(context) => context,
        };

        let unit = context.unit();
        let combatant = context
            .snapshot
            .unit(unit)
            .ok_or_else(|| RuntimeError::Provider {
                unit,
                message: "active unit missing from snapshot".into(),
            })?;
        let kind = self.providers.kind_for(combatant);
        let provider = self.providers.get(kind)?;

        let action = match provider.provide_action(unit, &context.snapshot).await {
            Ok(action) => action,
            Err(error) => {
                warn!(
                    target: "runtime",
                    %unit,
                    %kind,
                    error = %error,
                    "Provider failed, holding position"
                );
                CombatAction::hold(combatant)
            }
        };

        let submission = match self.handle.submit_action(action).await {
            Err(error) if error.is_validation() => {
                warn!(
                    target: "runtime",
                    %unit,
                    %kind,
                    error = %error,
                    "Action refused, holding position"
                );
                self.hold(&context).await?
            }
            other => other?,
        };

        Ok(StepOutcome::Acted { unit, submission })
    }

    async fn hold(&self, context: &TurnContext) -> Result<Submission> {
        let unit = context.unit();
        let combatant = context
            .snapshot
            .unit(unit)
            .ok_or_else(|| RuntimeError::Provider {
                unit,
                message: "active unit missing from snapshot".into(),
            })?;
        self.handle
            .submit_action(CombatAction::hold(combatant))
            .await
    }

    /// Run the battle to its end and return the final report.
    pub async fn run(&mut self) -> Result<BattleReport> {
        loop {
            if let StepOutcome::Finished(status) = self.step().await? {
                info!(target: "runtime", %status, "Battle loop finished");
                return self.handle.report().await;
            }
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// An action still in flight is applied before the worker exits.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    units: Vec<CombatUnit>,
    rng: Option<Arc<dyn RngOracle>>,
    providers: ProviderRegistry,
    loot: Option<Arc<dyn LootCollaborator>>,
    growth: Option<Arc<dyn GrowthCollaborator>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            units: Vec::new(),
            rng: None,
            providers: ProviderRegistry::new(),
            loot: None,
            growth: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.config.combat = combat;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Add combatants of either side.
    pub fn units(mut self, units: impl IntoIterator<Item = CombatUnit>) -> Self {
        self.units.extend(units);
        self
    }

    /// Add both rosters of a loaded encounter.
    pub fn encounter(self, encounter: Encounter) -> Self {
        self.units(encounter.into_units())
    }

    /// Replace the random source (defaults to [`PcgRng`]).
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn provider(mut self, kind: ProviderKind, provider: impl ActionProvider + 'static) -> Self {
        self.providers.register(kind, provider);
        self
    }

    pub fn provider_arc(mut self, kind: ProviderKind, provider: Arc<dyn ActionProvider>) -> Self {
        self.providers.register_arc(kind, provider);
        self
    }

    /// Route one unit to a provider kind other than its side default.
    pub fn bind_unit(mut self, unit: UnitId, kind: ProviderKind) -> Self {
        self.providers.bind_unit(unit, kind);
        self
    }

    pub fn loot(mut self, loot: impl LootCollaborator + 'static) -> Self {
        self.loot = Some(Arc::new(loot));
        self
    }

    pub fn growth(mut self, growth: impl GrowthCollaborator + 'static) -> Self {
        self.growth = Some(Arc::new(growth));
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        if self.units.is_empty() {
            return Err(RuntimeError::EmptyRoster);
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let rng = self.rng.unwrap_or_else(|| Arc::new(PcgRng));
        let engine = CombatEngine::initialize(self.units, self.config.combat.clone(), rng, seed)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        info!(
            target: "runtime",
            seed,
            allies = engine.allies().len(),
            enemies = engine.enemies().len(),
            "Battle started"
        );
        event_bus.publish(Event::Lifecycle(LifecycleEvent::Started {
            allies: engine.allies().to_vec(),
            enemies: engine.enemies().to_vec(),
            seed,
        }));

        let sim_worker = SimulationWorker::new(engine, command_rx, event_bus, self.config.settle_delay)
            .with_collaborators(self.loot, self.growth);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            providers: self.providers,
            seed,
            sim_worker_handle,
        })
    }
}
