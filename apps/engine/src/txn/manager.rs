use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::GameId;
use crate::error::EngineError;
use crate::events::bus::EventBus;
use crate::events::GameEvent;
use crate::txn::transaction::Transaction;

/// Orchestrates one logical player action: build, execute atomically,
/// then publish.
///
/// This is the single synchronization point every player-initiated
/// mutation passes through. Invocations against disjoint state proceed
/// concurrently; overlapping ones serialize on the guarded components
/// their operations touch.
pub struct TransactionManager {
    game_id: GameId,
    bus: Arc<EventBus>,
    event_log_capacity: usize,
}

impl TransactionManager {
    pub fn new(game_id: GameId, bus: Arc<EventBus>, event_log_capacity: usize) -> Self {
        Self {
            game_id,
            bus,
            event_log_capacity,
        }
    }

    /// Run `build` on a fresh transaction, then execute it.
    ///
    /// A `build` error abandons the transaction without executing
    /// anything. On commit the recorded events are published — followed
    /// by a trailing [`GameEvent::BroadcastRequested`] when anything
    /// changed — strictly after every state lock is released.
    pub async fn execute_atomic<F>(
        &self,
        ctx: &CancellationToken,
        build: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), EngineError>,
    {
        if ctx.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let mut txn = Transaction::new(self.game_id.clone(), self.event_log_capacity);
        build(&mut txn)?;

        let operations = txn.len();
        txn.execute(ctx).await?;

        let events = txn.take_events();
        debug!(
            game_id = %self.game_id,
            operations,
            events = events.len(),
            "transaction committed"
        );
        if events.is_empty() {
            return Ok(());
        }

        self.bus.publish_all(&events);
        self.bus.publish(&GameEvent::BroadcastRequested {
            game_id: self.game_id.clone(),
            player_ids: None,
        });
        Ok(())
    }
}
