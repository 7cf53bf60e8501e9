//! Provider that replays queued actions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use combat_core::{BattleSnapshot, CombatAction, UnitId};

use crate::api::{ActionProvider, HoldPositionProvider, Result};

/// Hands out pre-recorded actions in order, then falls back to holding
/// position.
#[derive(Default)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<CombatAction>>,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            queue: Mutex::new(actions.into_iter().collect()),
        }
    }

    pub fn push(&self, action: CombatAction) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(action);
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().map_or(0, |queue| queue.len())
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_action(
        &self,
        unit: UnitId,
        snapshot: &BattleSnapshot,
    ) -> Result<CombatAction> {
        let next = self
            .queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        match next {
            Some(action) => Ok(action),
            None => HoldPositionProvider.provide_action(unit, snapshot).await,
        }
    }
}
