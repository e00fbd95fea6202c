//! Per-game environmental parameters: temperature, oxygen, oceans.

use serde::{Deserialize, Serialize};

use crate::domain::GameId;
use crate::events::GameEvent;
use crate::state::guarded::Guarded;

pub const MIN_TEMPERATURE: i32 = -30;
pub const MAX_TEMPERATURE: i32 = 8;
/// Degrees per temperature step.
pub const TEMPERATURE_STEP: i32 = 2;
pub const MIN_OXYGEN: i32 = 0;
pub const MAX_OXYGEN: i32 = 14;
pub const MIN_OCEANS: i32 = 0;
pub const MAX_OCEANS: i32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub temperature: i32,
    pub oxygen: i32,
    pub oceans: i32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            temperature: MIN_TEMPERATURE,
            oxygen: MIN_OXYGEN,
            oceans: MIN_OCEANS,
        }
    }
}

/// Guarded state component for the game-level parameters.
///
/// Raises clamp at the bounds and report the *actual* change: raising
/// oxygen by 5 steps when 2 remain applies 2 and emits an event whose
/// delta is 2. A raise that changes nothing emits no event.
pub struct GlobalParameters {
    game_id: GameId,
    inner: Guarded<Parameters>,
}

impl GlobalParameters {
    pub fn new(game_id: GameId) -> Self {
        Self::with_values(game_id, Parameters::default())
    }

    pub fn with_values(game_id: GameId, values: Parameters) -> Self {
        Self {
            game_id,
            inner: Guarded::new(values),
        }
    }

    pub fn snapshot(&self) -> Parameters {
        self.inner.read()
    }

    pub fn is_maxed(&self) -> bool {
        let p = self.inner.read();
        p.temperature >= MAX_TEMPERATURE && p.oxygen >= MAX_OXYGEN && p.oceans >= MAX_OCEANS
    }

    /// Raise (or, with negative `steps`, lower) the temperature. Returns
    /// the actual signed number of steps applied and the events produced.
    pub fn raise_temperature(&self, steps: i32) -> (i32, Vec<GameEvent>) {
        let game_id = self.game_id.clone();
        self.inner.mutate(move |p| {
            let old = p.temperature;
            let new = (old + steps * TEMPERATURE_STEP).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
            p.temperature = new;
            let actual = (new - old) / TEMPERATURE_STEP;
            let events = if old == new {
                Vec::new()
            } else {
                vec![GameEvent::TemperatureChanged { game_id, old, new }]
            };
            (actual, events)
        })
    }

    /// Raise (or lower) oxygen by whole percentage steps. Returns the
    /// actual signed change and the events produced.
    pub fn raise_oxygen(&self, steps: i32) -> (i32, Vec<GameEvent>) {
        let game_id = self.game_id.clone();
        self.inner.mutate(move |p| {
            let old = p.oxygen;
            let new = (old + steps).clamp(MIN_OXYGEN, MAX_OXYGEN);
            p.oxygen = new;
            let events = if old == new {
                Vec::new()
            } else {
                vec![GameEvent::OxygenChanged { game_id, old, new }]
            };
            (new - old, events)
        })
    }

    /// Place one ocean. Returns whether a tile was actually placed (false
    /// once the ocean count is at its maximum) and the events produced.
    pub fn place_ocean(&self) -> (bool, Vec<GameEvent>) {
        let game_id = self.game_id.clone();
        self.inner.mutate(move |p| {
            let old = p.oceans;
            if old >= MAX_OCEANS {
                return (false, Vec::new());
            }
            p.oceans = old + 1;
            (
                true,
                vec![GameEvent::OceansChanged {
                    game_id,
                    old,
                    new: old + 1,
                }],
            )
        })
    }

    /// Undo one ocean placement.
    pub fn remove_ocean(&self) -> (bool, Vec<GameEvent>) {
        let game_id = self.game_id.clone();
        self.inner.mutate(move |p| {
            let old = p.oceans;
            if old <= MIN_OCEANS {
                return (false, Vec::new());
            }
            p.oceans = old - 1;
            (
                true,
                vec![GameEvent::OceansChanged {
                    game_id,
                    old,
                    new: old - 1,
                }],
            )
        })
    }
}
