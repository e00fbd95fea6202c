use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::GameId;
use crate::error::EngineError;
use crate::events::GameEvent;
use crate::txn::operation::{Operation, StepFn};

/// Shared sink for the events a transaction's operations produce.
///
/// Operation closures hold a clone and record as they apply mutations;
/// the manager drains it only after a full commit. Events recorded by a
/// rolled-back transaction are discarded with it.
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventLog {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
        }
    }

    pub fn record(&self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }
        self.inner.lock().extend(events);
    }

    pub fn record_one(&self, event: GameEvent) {
        self.inner.lock().push(event);
    }

    fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.inner.lock())
    }
}

/// An all-or-nothing ordered sequence of operations.
///
/// Built by a caller-supplied closure, executed exactly once, then
/// finished: a completed transaction accepts no further operations and
/// cannot re-execute.
pub struct Transaction {
    game_id: GameId,
    operations: Vec<Operation>,
    events: EventLog,
    finished: bool,
}

impl Transaction {
    pub(crate) fn new(game_id: GameId, event_capacity: usize) -> Self {
        Self {
            game_id,
            operations: Vec::new(),
            events: EventLog::with_capacity(event_capacity),
            finished: false,
        }
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Handle for operation closures to record the events they produce.
    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    /// Append an operation. Ignored with a warning on a finished
    /// transaction.
    pub fn push(&mut self, operation: Operation) {
        if self.finished {
            warn!(
                game_id = %self.game_id,
                operation = operation.name(),
                "operation pushed onto finished transaction, ignoring"
            );
            return;
        }
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run all operations in append order.
    ///
    /// On the first failure the already-applied prefix is rolled back
    /// last-applied-first, rollback failures are logged without masking
    /// the triggering error, and the triggering error is returned wrapped
    /// with the failing operation's name. Cancellation is checked before
    /// every operation; a transaction cancelled mid-flight still rolls
    /// back what ran. Zero operations is a no-op success.
    pub(crate) async fn execute(&mut self, ctx: &CancellationToken) -> Result<(), EngineError> {
        if self.finished {
            return Err(EngineError::TransactionFinished);
        }
        self.finished = true;

        let operations = std::mem::take(&mut self.operations);

        // Irreversible operations may only sit in the final slot; reject
        // before anything runs.
        if let Some(op) = operations
            .iter()
            .rev()
            .skip(1)
            .find(|op| op.is_irreversible())
        {
            return Err(EngineError::IrreversibleNotLast {
                name: op.name().to_string(),
            });
        }

        let mut applied: Vec<(String, Option<StepFn>)> = Vec::with_capacity(operations.len());

        for operation in operations {
            if ctx.is_cancelled() {
                Self::roll_back(&self.game_id, &mut applied).await;
                return Err(EngineError::Cancelled);
            }

            let Operation { name, forward, reverse } = operation;

            if let Err(err) = forward().await {
                debug!(
                    game_id = %self.game_id,
                    operation = %name,
                    applied = applied.len(),
                    "operation failed, rolling back applied prefix"
                );
                Self::roll_back(&self.game_id, &mut applied).await;
                return Err(EngineError::operation(name, err));
            }

            applied.push((name, reverse));
        }

        Ok(())
    }

    async fn roll_back(game_id: &GameId, applied: &mut Vec<(String, Option<StepFn>)>) {
        while let Some((name, reverse)) = applied.pop() {
            let Some(reverse) = reverse else {
                // Only the final operation may be irreversible, and a
                // failure can never sit downstream of it.
                continue;
            };
            if let Err(err) = reverse().await {
                // Log-only: the triggering error stays the one surfaced
                // to the caller. A rollback failure is an
                // internal-consistency alarm for operators.
                let alarm = EngineError::rollback(&name, err.to_string());
                warn!(game_id = %game_id, error = %alarm, "rollback failed");
            }
        }
    }

    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}
