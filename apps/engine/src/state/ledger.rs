//! Per-player resource ledger.

use crate::domain::resources::Resources;
use crate::domain::{GameId, PlayerId};
use crate::errors::validation::ValidationError;
use crate::events::GameEvent;
use crate::state::guarded::Guarded;

/// Guarded state component holding one player's spendable resources.
///
/// Debits are all-or-nothing: a shortfall in any dimension leaves every
/// dimension untouched.
pub struct ResourceLedger {
    game_id: GameId,
    player_id: PlayerId,
    inner: Guarded<Resources>,
}

impl ResourceLedger {
    pub fn new(game_id: GameId, player_id: PlayerId, starting: Resources) -> Self {
        Self {
            game_id,
            player_id,
            inner: Guarded::new(starting),
        }
    }

    pub fn snapshot(&self) -> Resources {
        self.inner.read()
    }

    /// Deduct `cost` from the held resources, failing without mutation on
    /// the first insufficient dimension.
    pub fn debit(&self, cost: &Resources) -> Result<Vec<GameEvent>, ValidationError> {
        let game_id = self.game_id.clone();
        let player_id = self.player_id.clone();
        let cost = *cost;
        self.inner.mutate(move |held| {
            if let Some((kind, required, available)) = held.first_shortfall(&cost) {
                return Err(ValidationError::InsufficientResources {
                    kind,
                    required,
                    available,
                });
            }
            held.sub(&cost);
            Ok(vec![GameEvent::ResourcesChanged {
                game_id,
                player_id,
                resources: *held,
            }])
        })
    }

    /// Add `gain` to the held resources, flooring each dimension at zero.
    pub fn credit(&self, gain: &Resources) -> Vec<GameEvent> {
        let game_id = self.game_id.clone();
        let player_id = self.player_id.clone();
        let gain = *gain;
        self.inner.mutate(move |held| {
            held.add_clamped(&gain);
            vec![GameEvent::ResourcesChanged {
                game_id,
                player_id,
                resources: *held,
            }]
        })
    }
}
