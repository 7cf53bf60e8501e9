//! Simulation worker that owns the authoritative [`CombatEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives the
//! two-phase action protocol and publishes events to the EventBus.
//!
//! An accepted action stays in flight for `settle_delay` so presentation can
//! play it out. During that window further submissions are answered with
//! [`Submission::Busy`] and turn requests are parked; they are answered only
//! once the outcome has been applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use combat_core::{
    ActionOutcome, ActionStart, Applied, BattleReport, BattleSnapshot, CombatAction, CombatEngine,
    CombatError, EngineError, UnitId, WeaponSlot,
};

use crate::api::{
    GrowthCollaborator, LootCollaborator, Result, Submission, TurnContext, TurnPrompt,
};
use crate::events::{CombatEvent, Event, EventBus, LifecycleEvent, TurnEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Open (or re-read) the current turn. Parked while an action settles.
    NextTurn {
        reply: oneshot::Sender<Result<TurnPrompt>>,
    },
    /// Submit an action for the active unit.
    SubmitAction {
        action: CombatAction,
        reply: oneshot::Sender<Result<Submission>>,
    },
    SelectWeapon {
        unit: UnitId,
        slot: WeaponSlot,
        reply: oneshot::Sender<Result<()>>,
    },
    Retreat {
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Query the current battle state (read-only).
    QuerySnapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    Report {
        reply: oneshot::Sender<Result<BattleReport>>,
    },
}

/// Background task that processes battle commands.
pub struct SimulationWorker {
    engine: CombatEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    settle_delay: Duration,
    settle_deadline: Option<Instant>,
    parked_turns: Vec<oneshot::Sender<Result<TurnPrompt>>>,
    loot: Option<Arc<dyn LootCollaborator>>,
    growth: Option<Arc<dyn GrowthCollaborator>>,
    handed_off: bool,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        engine: CombatEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        settle_delay: Duration,
    ) -> Self {
        info!(
            target: "runtime::worker",
            allies = engine.allies().len(),
            enemies = engine.enemies().len(),
            queued = engine.queue().len(),
            "SimulationWorker initialized"
        );

        Self {
            engine,
            command_rx,
            event_bus,
            settle_delay,
            settle_deadline: None,
            parked_turns: Vec::new(),
            loot: None,
            growth: None,
            handed_off: false,
        }
    }

    pub fn with_collaborators(
        mut self,
        loot: Option<Arc<dyn LootCollaborator>>,
        growth: Option<Arc<dyn GrowthCollaborator>>,
    ) -> Self {
        self.loot = loot;
        self.growth = growth;
        self
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        if self.engine.status().is_terminal() {
            self.conclude().await;
        }

        loop {
            let deadline = self.settle_deadline;
            tokio::select! {
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.settle().await;
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
            }
        }

        // accepted actions always run to completion
        if self.engine.is_action_in_flight() {
            self.settle().await;
        }
        debug!(target: "runtime::worker", "SimulationWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::NextTurn { reply } => {
                if self.engine.is_action_in_flight() {
                    debug!(target: "runtime::worker", "Turn requested while settling, parking");
                    self.parked_turns.push(reply);
                    return;
                }
                let prompt = self.turn_prompt();
                if reply.send(prompt).is_err() {
                    debug!("NextTurn reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAction { action, reply } => {
                let result = self.submit(action).await;
                if reply.send(result).is_err() {
                    debug!("SubmitAction reply channel closed (caller dropped)");
                }
            }
            Command::SelectWeapon { unit, slot, reply } => {
                let result = self.engine.select_weapon(unit, slot);
                if let Err(error) = &result {
                    self.report_failure(error);
                } else {
                    debug!(target: "runtime::worker", %unit, ?slot, "Weapon selected");
                }
                if reply.send(result.map_err(Into::into)).is_err() {
                    debug!("SelectWeapon reply channel closed (caller dropped)");
                }
            }
            Command::Retreat { reply } => {
                let result = self.engine.retreat();
                match &result {
                    Ok(true) => {
                        info!(target: "runtime::worker", "Party retreats");
                        self.conclude().await;
                    }
                    Ok(false) => debug!(target: "runtime::worker", "Retreat after battle end ignored"),
                    Err(error) => self.report_failure(error),
                }
                if reply.send(result.map_err(Into::into)).is_err() {
                    debug!("Retreat reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::Report { reply } => {
                let result = self.engine.finalize().cloned().map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("Report reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Opens the next turn, or reports that the battle is over.
    fn turn_prompt(&mut self) -> Result<TurnPrompt> {
        let status = self.engine.status();
        if status.is_terminal() {
            return Ok(TurnPrompt::Finished(status));
        }

        let fresh = self.engine.current_turn().is_none();
        match self.engine.next_turn() {
            Ok(turn) => {
                if fresh {
                    debug!(
                        target: "runtime::worker",
                        unit = %turn.unit,
                        time = %turn.time,
                        "Turn started"
                    );
                    self.event_bus.publish(Event::Turn(TurnEvent {
                        unit: turn.unit,
                        time: turn.time,
                    }));
                }
                Ok(TurnPrompt::Active(TurnContext {
                    turn,
                    snapshot: self.engine.snapshot(),
                }))
            }
            Err(error) => {
                self.report_failure(&error);
                Err(error.into())
            }
        }
    }

    /// Phase one of the action protocol. Starts the settle window on success.
    async fn submit(&mut self, action: CombatAction) -> Result<Submission> {
        let actor = action.actor();
        match self.engine.begin_action(action) {
            Ok(ActionStart::Busy) => {
                debug!(
                    target: "runtime::worker",
                    %actor,
                    "Action submitted while another is settling, ignoring"
                );
                Ok(Submission::Busy)
            }
            Ok(ActionStart::Started(receipt)) => {
                debug!(
                    target: "runtime::worker",
                    %actor,
                    kind = receipt.action.as_str(),
                    swings = receipt.rolls.len(),
                    delay_points = receipt.delay_points,
                    "Action accepted"
                );
                self.event_bus.publish(Event::Combat(CombatEvent::ActionStarted {
                    receipt: receipt.clone(),
                }));

                if self.settle_delay.is_zero() {
                    self.settle().await;
                } else {
                    self.settle_deadline = Some(Instant::now() + self.settle_delay);
                }
                Ok(Submission::Accepted(receipt))
            }
            Err(error) => {
                self.report_failure(&error);
                if !error.severity().is_fatal() {
                    self.event_bus.publish(Event::Combat(CombatEvent::ActionRejected {
                        actor,
                        error: error.to_string(),
                    }));
                }
                Err(error.into())
            }
        }
    }

    /// Phase two: apply the settled action, then answer parked turn requests.
    async fn settle(&mut self) {
        self.settle_deadline = None;

        match self.engine.complete_action() {
            Ok(outcome) => {
                log_outcome(&outcome);
                let terminal = outcome.status.is_terminal();
                self.event_bus
                    .publish(Event::Combat(CombatEvent::ActionApplied { outcome }));
                if terminal {
                    self.conclude().await;
                }
            }
            Err(error) => self.report_failure(&error),
        }

        for reply in std::mem::take(&mut self.parked_turns) {
            let prompt = self.turn_prompt();
            if reply.send(prompt).is_err() {
                debug!("Parked NextTurn reply channel closed (caller dropped)");
            }
        }
    }

    /// Freezes the report and hands it to the collaborators, once.
    async fn conclude(&mut self) {
        if self.handed_off {
            return;
        }
        let report = match self.engine.finalize() {
            Ok(report) => report.clone(),
            Err(error) => {
                self.report_failure(&error);
                return;
            }
        };
        self.handed_off = true;

        info!(
            target: "runtime::worker",
            status = %report.status,
            actions = report.actions,
            downed = report.loot_eligible.len(),
            "Battle ended"
        );

        if let Some(loot) = &self.loot
            && let Err(error) = loot.collect(&report.loot_eligible).await
        {
            warn!(target: "runtime::worker", error = %error, "Loot collaborator failed");
        }
        if let Some(growth) = &self.growth
            && let Err(error) = growth.record(&report).await
        {
            warn!(target: "runtime::worker", error = %error, "Growth collaborator failed");
        }

        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::Ended {
                report: Box::new(report),
            }));
    }

    fn report_failure(&self, error: &EngineError) {
        if error.severity().is_fatal() {
            error!(
                target: "runtime::worker",
                code = error.error_code(),
                error = %error,
                "Battle aborted"
            );
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Aborted {
                    error: error.to_string(),
                    status: self.engine.status(),
                }));
        } else {
            debug!(
                target: "runtime::worker",
                code = error.error_code(),
                severity = error.severity().as_str(),
                error = %error,
                "Command rejected"
            );
        }
    }
}

fn log_outcome(outcome: &ActionOutcome) {
    match &outcome.applied {
        Applied::Attack(attack) => info!(
            target: "runtime::worker",
            time = %outcome.turn.time,
            attacker = %attack.attacker,
            defender = %attack.target,
            damage = attack.damage,
            hp = attack.hp_after,
            downed = ?attack.downed,
            "Attack applied"
        ),
        Applied::Reposition {
            unit,
            from,
            to,
            swapped_with,
        } => info!(
            target: "runtime::worker",
            time = %outcome.turn.time,
            %unit,
            %from,
            %to,
            swapped_with = ?swapped_with,
            "Reposition applied"
        ),
    }
}
