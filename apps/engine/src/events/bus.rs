//! In-process publish/subscribe decoupling state mutation from
//! notification and reactive effects.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::events::GameEvent;

pub type SubscriptionId = u64;

type Handler = Arc<dyn Fn(&GameEvent) -> Result<(), EngineError> + Send + Sync>;

#[derive(Default)]
struct Subscriptions {
    next_id: SubscriptionId,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Synchronous in-process event bus.
///
/// Handlers run in subscription order on the publisher's thread. Publish
/// snapshots the handler list and drops the bus lock before invoking
/// anything, so handlers may publish, subscribe, or unsubscribe
/// reentrantly. Handler errors are logged and swallowed: one faulty
/// reactive effect must never break the state-mutation path.
///
/// Publish must only be called once all guarded-state locks are released;
/// the bus itself never touches guarded state. Handlers are expected to
/// return quickly: anything slow (network delivery, disk) belongs behind
/// its own queue, the way the broadcast subscriber hands off to the
/// transport-owning collaborator.
pub struct EventBus {
    subscriptions: RwLock<Subscriptions>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Subscriptions {
                next_id: 1,
                handlers: Vec::new(),
            }),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&GameEvent) -> Result<(), EngineError> + Send + Sync + 'static,
    {
        let mut subs = self.subscriptions.write();
        let id = subs.next_id;
        subs.next_id += 1;
        subs.handlers.push((id, Arc::new(handler)));
        debug!(subscription_id = id, "event handler subscribed");
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        let before = subs.handlers.len();
        subs.handlers.retain(|(sub_id, _)| *sub_id != id);
        if subs.handlers.len() < before {
            debug!(subscription_id = id, "event handler unsubscribed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().handlers.len()
    }

    pub fn publish(&self, event: &GameEvent) {
        // Snapshot under the read lock, invoke with no lock held.
        let handlers: Vec<(SubscriptionId, Handler)> = self
            .subscriptions
            .read()
            .handlers
            .iter()
            .map(|(id, h)| (*id, Arc::clone(h)))
            .collect();

        if handlers.is_empty() {
            debug!(event = event.kind(), "no subscribers for event");
            return;
        }

        for (id, handler) in handlers {
            if let Err(err) = handler(event) {
                warn!(
                    subscription_id = id,
                    event = event.kind(),
                    error = %err,
                    "event handler failed, continuing"
                );
            }
        }
    }

    pub fn publish_all(&self, events: &[GameEvent]) {
        for event in events {
            self.publish(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
