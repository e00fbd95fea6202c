#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Transactional state-mutation core for a multiplayer turn-based
//! terraforming simulation server.
//!
//! Many concurrently connected clients issue actions against shared
//! per-game and per-player state. Every player-initiated mutation runs as
//! an atomic transaction of reversible operations: validation first, then
//! ordered execution, strict-reverse rollback on failure, and event
//! publication only after commit with no state lock held.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod effects;
pub mod error;
pub mod errors;
pub mod events;
pub mod repos;
pub mod services;
pub mod state;
pub mod subscriptions;
pub mod txn;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EngineConfig;
pub use error::EngineError;
pub use errors::ValidationError;
pub use events::bus::EventBus;
pub use events::GameEvent;
pub use state::{EngineState, GameSession};
pub use subscriptions::{BroadcastSubscriber, Broadcaster};
pub use txn::{Operation, Transaction, TransactionManager};

// Prelude for test convenience
pub mod prelude {
    pub use super::config::EngineConfig;
    pub use super::domain::{Game, GameId, GameStatus, Player, PlayerId, Production, ResourceKind, Resources};
    pub use super::error::EngineError;
    pub use super::errors::ValidationError;
    pub use super::events::bus::EventBus;
    pub use super::events::GameEvent;
    pub use super::services::{
        ActionValidator, CardService, GameService, StandardProjectService, TurnFlowService,
    };
    pub use super::state::{EngineState, GameSession};
    pub use super::txn::{Operation, Transaction, TransactionManager};
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
