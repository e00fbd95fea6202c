//! Per-player turn state: action budget, passed flag, per-generation
//! activation counters.

use std::collections::HashMap;

use crate::domain::{GameId, PlayerId};
use crate::errors::validation::ValidationError;
use crate::events::GameEvent;
use crate::state::guarded::Guarded;

/// Copy-out value of a [`TurnState`], also used to restore it on rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub remaining: i32,
    pub passed: bool,
    /// On-activate effect IDs already used this generation.
    pub activations: HashMap<String, u32>,
}

/// Guarded state component for one player's turn bookkeeping.
///
/// The action budget floors at zero; only turn-advance (or generation
/// reset) may refill it.
pub struct TurnState {
    game_id: GameId,
    player_id: PlayerId,
    inner: Guarded<TurnSnapshot>,
}

impl TurnState {
    pub fn new(game_id: GameId, player_id: PlayerId, budget: i32) -> Self {
        Self {
            game_id,
            player_id,
            inner: Guarded::new(TurnSnapshot {
                remaining: budget,
                ..TurnSnapshot::default()
            }),
        }
    }

    pub fn remaining(&self) -> i32 {
        self.inner.read().remaining
    }

    pub fn has_passed(&self) -> bool {
        self.inner.read().passed
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        self.inner.read()
    }

    /// Restore a previously captured snapshot (rollback path).
    pub fn restore(&self, snapshot: TurnSnapshot) -> Vec<GameEvent> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            let changed = state.remaining != snapshot.remaining;
            *state = snapshot;
            if changed {
                vec![GameEvent::ActionsChanged {
                    game_id,
                    player_id,
                    remaining: state.remaining,
                }]
            } else {
                Vec::new()
            }
        })
    }

    /// Spend one action. Fails without mutation when the budget is empty.
    pub fn consume_action(&self) -> Result<Vec<GameEvent>, ValidationError> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            if state.remaining <= 0 {
                return Err(ValidationError::NoActionsRemaining);
            }
            state.remaining -= 1;
            Ok(vec![GameEvent::ActionsChanged {
                game_id,
                player_id,
                remaining: state.remaining,
            }])
        })
    }

    /// Give back one consumed action (rollback of `consume_action`).
    pub fn restore_action(&self) -> Vec<GameEvent> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            state.remaining += 1;
            vec![GameEvent::ActionsChanged {
                game_id,
                player_id,
                remaining: state.remaining,
            }]
        })
    }

    /// Refill the budget at turn start.
    pub fn reset_budget(&self, budget: i32) -> Vec<GameEvent> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            if state.remaining == budget {
                return Vec::new();
            }
            state.remaining = budget;
            vec![GameEvent::ActionsChanged {
                game_id,
                player_id,
                remaining: budget,
            }]
        })
    }

    pub fn set_passed(&self, passed: bool) -> Vec<GameEvent> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            let newly_passed = passed && !state.passed;
            state.passed = passed;
            if newly_passed {
                vec![GameEvent::PlayerPassed { game_id, player_id }]
            } else {
                Vec::new()
            }
        })
    }

    /// Record one use of an on-activate effect, enforcing the
    /// once-per-generation gate.
    pub fn note_activation(&self, effect_id: &str) -> Result<(), ValidationError> {
        let effect_id = effect_id.to_string();
        self.inner.mutate(move |state| {
            let uses = state.activations.entry(effect_id.clone()).or_insert(0);
            if *uses >= 1 {
                return Err(ValidationError::EffectAlreadyActivated { effect_id });
            }
            *uses += 1;
            Ok(())
        })
    }

    /// Forget one use of an effect (rollback of `note_activation`).
    pub fn clear_activation(&self, effect_id: &str) {
        self.inner.mutate(|state| {
            if let Some(uses) = state.activations.get_mut(effect_id) {
                *uses = uses.saturating_sub(1);
                if *uses == 0 {
                    state.activations.remove(effect_id);
                }
            }
        });
    }

    /// Generation rollover: passed flag and activation counters clear,
    /// budget refills.
    pub fn reset_generation(&self, budget: i32) -> Vec<GameEvent> {
        let (game_id, player_id) = (self.game_id.clone(), self.player_id.clone());
        self.inner.mutate(move |state| {
            state.passed = false;
            state.activations.clear();
            let changed = state.remaining != budget;
            state.remaining = budget;
            if changed {
                vec![GameEvent::ActionsChanged {
                    game_id,
                    player_id,
                    remaining: budget,
                }]
            } else {
                Vec::new()
            }
        })
    }
}
