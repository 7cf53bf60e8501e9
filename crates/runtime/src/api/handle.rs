//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving turns, submitting actions or streaming events from specific
//! topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    ActionReceipt, BattleReport, BattleSnapshot, CombatAction, CombatStatus, InitiativeItem,
    UnitId, WeaponSlot,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Open turn plus the battle as the active unit sees it.
#[derive(Clone, Debug)]
pub struct TurnContext {
    pub turn: InitiativeItem,
    pub snapshot: BattleSnapshot,
}

impl TurnContext {
    pub fn unit(&self) -> UnitId {
        self.turn.unit
    }
}

/// Answer to a turn request.
#[derive(Clone, Debug)]
pub enum TurnPrompt {
    Active(TurnContext),
    /// The battle ended; no more turns will be handed out.
    Finished(CombatStatus),
}

/// Answer to an action submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Accepted(ActionReceipt),
    /// Another action is still settling; the submission was ignored.
    Busy,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Returns the unit that acts next.
    ///
    /// While an action is settling the request waits until its outcome has
    /// been applied, so the answer always reflects the finished action.
    pub async fn next_turn(&self) -> Result<TurnPrompt> {
        self.request(|reply| Command::NextTurn { reply }).await?
    }

    /// Submits an action for the active unit.
    pub async fn submit_action(&self, action: CombatAction) -> Result<Submission> {
        self.request(|reply| Command::SubmitAction { action, reply })
            .await?
    }

    /// Switches the active unit's weapon without ending its turn.
    pub async fn select_weapon(&self, unit: UnitId, slot: WeaponSlot) -> Result<()> {
        self.request(|reply| Command::SelectWeapon { unit, slot, reply })
            .await?
    }

    /// Ends the battle with a retreat. Returns false if it was already over.
    pub async fn retreat(&self) -> Result<bool> {
        self.request(|reply| Command::Retreat { reply }).await?
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Final report of an ended battle.
    pub async fn report(&self) -> Result<BattleReport> {
        self.request(|reply| Command::Report { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Rolls and applied outcomes of every action
    /// - `Topic::Turn` - Turn management events
    /// - `Topic::Lifecycle` - Battle start, end and abort
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Play floating damage numbers
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
