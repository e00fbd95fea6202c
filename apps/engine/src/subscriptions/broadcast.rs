//! Forwarding `BroadcastRequested` events to the transport-facing
//! collaborator.
//!
//! The core never talks to a transport: it publishes
//! [`GameEvent::BroadcastRequested`] and whoever owns the delivery layer
//! implements [`Broadcaster`] and attaches a [`BroadcastSubscriber`].

use std::sync::Arc;

use crate::domain::{GameId, PlayerId};
use crate::events::bus::{EventBus, SubscriptionId};
use crate::events::GameEvent;

/// External collaborator that serializes and delivers updated state.
/// `player_ids: None` means every player in the game.
pub trait Broadcaster: Send + Sync {
    fn broadcast(&self, game_id: &GameId, player_ids: Option<&[PlayerId]>);
}

/// Owns the bus subscription that feeds a [`Broadcaster`].
pub struct BroadcastSubscriber {
    bus: Arc<EventBus>,
    subscription: SubscriptionId,
}

impl BroadcastSubscriber {
    pub fn attach(bus: Arc<EventBus>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        let subscription = bus.subscribe(move |event| {
            if let GameEvent::BroadcastRequested {
                game_id,
                player_ids,
            } = event
            {
                broadcaster.broadcast(game_id, player_ids.as_deref());
            }
            Ok(())
        });
        Self { bus, subscription }
    }

    pub fn detach(self) {
        self.bus.unsubscribe(self.subscription);
    }
}
