//! Outcome applicator: the only place hp, status and metrics change.

use crate::combat::{AttackForecast, AttackRollResult, total_damage};
use crate::state::{Faction, Line, Side, UnitId, UnitStatus};

use super::{Applied, CombatEngine, EngineError};

/// Effect of one resolved attack on its target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackApplied {
    pub attacker: UnitId,
    pub target: UnitId,
    pub damage: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    /// Set when the target dropped to 0 hp during this attack.
    pub downed: Option<UnitStatus>,
}

impl AttackApplied {
    pub fn is_downed(&self) -> bool {
        self.downed.is_some()
    }
}

impl CombatEngine {
    pub(super) fn apply_attack(
        &mut self,
        forecast: &AttackForecast,
        rolls: &[AttackRollResult],
    ) -> Result<AttackApplied, EngineError> {
        let attacker = forecast.attacker;
        let damage = total_damage(rolls);

        let target = self.roster_unit_mut(forecast.target)?;
        let hp_before = target.stats.hp;
        target.stats.hp = hp_before.saturating_sub(damage);
        let hp_after = target.stats.hp;

        let downed = if hp_before > 0 && hp_after == 0 {
            let status = match target.faction {
                Faction::Player => UnitStatus::Unconscious,
                _ => {
                    let roll = killing_swing(rolls, hp_before).map_or(1.0, |swing| swing.lethality_roll);
                    if roll < forecast.lethality {
                        UnitStatus::Dead
                    } else {
                        UnitStatus::Unconscious
                    }
                }
            };
            target.status = status;
            Some(status)
        } else {
            None
        };

        if let Some(metrics) = self.result.metrics.get_mut(&attacker) {
            for roll in rolls {
                metrics.record_swing(roll);
            }
            if downed.is_some() {
                metrics.kills += 1;
            }
        }
        if let Some(metrics) = self.result.metrics.get_mut(&forecast.target) {
            for roll in rolls {
                metrics.record_received(roll);
            }
        }

        if downed.is_some() {
            let units = &self.units;
            self.queue
                .purge(|id| units.get(&id).is_some_and(|unit| unit.is_alive()));
            self.check_termination();
        }

        Ok(AttackApplied {
            attacker,
            target: forecast.target,
            damage,
            hp_before,
            hp_after,
            downed,
        })
    }

    /// Moves `unit` to `to`, swapping places with an alive ally already there.
    pub(super) fn apply_reposition(&mut self, unit: UnitId, to: Line) -> Result<Applied, EngineError> {
        let mover = self.roster_unit(unit)?;
        let from = mover.line;
        let side = mover.side();

        let swapped_with = if from == to {
            None
        } else {
            self.occupant(side, to, unit)
        };

        if let Some(other) = swapped_with {
            self.roster_unit_mut(other)?.line = from;
        }
        self.roster_unit_mut(unit)?.line = to;

        Ok(Applied::Reposition {
            unit,
            from,
            to,
            swapped_with,
        })
    }

    fn occupant(&self, side: Side, line: Line, except: UnitId) -> Option<UnitId> {
        self.units
            .values()
            .find(|other| {
                other.id != except && other.is_alive() && other.side() == side && other.line == line
            })
            .map(|other| other.id)
    }
}

/// Swing whose damage took the target from `hp` to zero.
fn killing_swing(rolls: &[AttackRollResult], hp: u32) -> Option<&AttackRollResult> {
    let mut dealt = 0u32;
    rolls.iter().find(|roll| {
        dealt = dealt.saturating_add(roll.damage);
        roll.damage > 0 && dealt >= hp
    })
}
