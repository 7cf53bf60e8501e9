use crate::config::CombatConfig;
use crate::state::{CombatUnit, TurnTime, UnitId};

/// One queued turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeItem {
    pub unit: UnitId,
    pub time: TurnTime,
}

/// Time between two turns of a unit, or `None` when it cannot be scheduled.
///
/// `cadence = 100 / initiative`, rounded to hundredths.
pub fn turn_cadence(initiative: u32) -> Option<TurnTime> {
    if initiative == 0 {
        return None;
    }
    Some(TurnTime::from_f64(
        CombatConfig::CADENCE_NUMERATOR / initiative as f64,
    ))
}

/// Extra time caused by `delay_points` for a unit with `initiative`.
///
/// `offset = (100 / initiative) * (delay_points / initiative)`.
pub fn delay_offset(initiative: u32, delay_points: u32) -> Option<TurnTime> {
    if initiative == 0 {
        return None;
    }
    let initiative = initiative as f64;
    Some(TurnTime::from_f64(
        (CombatConfig::CADENCE_NUMERATOR / initiative) * (delay_points as f64 / initiative),
    ))
}

/// Time-ascending queue of upcoming turns.
///
/// Invariants:
/// - times are non-decreasing from head to tail
/// - entries only reference alive units (callers purge on status change)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeQueue {
    entries: Vec<InitiativeItem>,
}

impl InitiativeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the opening queue: every alive, schedulable unit at time zero,
    /// ordered by higher initiative first and then by id.
    pub fn seed<'a>(units: impl IntoIterator<Item = &'a CombatUnit>) -> Self {
        let mut ranked: Vec<(u32, UnitId)> = units
            .into_iter()
            .filter(|unit| unit.is_alive() && turn_cadence(unit.stats.initiative).is_some())
            .map(|unit| (unit.stats.initiative, unit.id))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        Self {
            entries: ranked
                .into_iter()
                .map(|(_, unit)| InitiativeItem {
                    unit,
                    time: TurnTime::ZERO,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn peek(&self) -> Option<&InitiativeItem> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InitiativeItem> {
        self.entries.iter()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.entries.iter().any(|entry| entry.unit == unit)
    }

    /// Removes and returns the head entry.
    pub fn pop_next_turn(&mut self) -> Option<InitiativeItem> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Queues the next turn of `unit` one cadence after `last_time`.
    ///
    /// The entry goes right after the last entry whose time is not later,
    /// so equal-time entries keep their insertion order. Returns the queued
    /// item, or `None` when the initiative cannot be scheduled.
    pub fn schedule_next_turn(
        &mut self,
        unit: UnitId,
        last_time: TurnTime,
        initiative: u32,
    ) -> Option<InitiativeItem> {
        let item = InitiativeItem {
            unit,
            time: last_time + turn_cadence(initiative)?,
        };
        let index = self
            .entries
            .iter()
            .rposition(|entry| entry.time <= item.time)
            .map_or(0, |position| position + 1);
        self.entries.insert(index, item);
        Some(item)
    }

    /// Pushes every queued entry of `unit` later by the delay offset, then
    /// re-sorts by time. The turn currently being resolved has already been
    /// popped and is never touched.
    pub fn apply_delay(&mut self, unit: UnitId, delay_points: u32, initiative: u32) {
        let Some(offset) = delay_offset(initiative, delay_points) else {
            return;
        };
        if offset == TurnTime::ZERO {
            return;
        }
        for entry in self.entries.iter_mut().filter(|entry| entry.unit == unit) {
            entry.time = entry.time + offset;
        }
        self.entries.sort_by_key(|entry| entry.time);
    }

    /// Drops every entry whose unit fails `is_alive`. Returns how many went.
    pub fn purge(&mut self, mut is_alive: impl FnMut(UnitId) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| is_alive(entry.unit));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True when times never decrease from head to tail.
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }
}
