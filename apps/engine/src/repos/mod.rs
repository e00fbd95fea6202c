//! Repository contracts for the records the engine persists.
//!
//! The core stays decoupled from storage: any error from a repository is
//! a non-retryable operation failure that triggers rollback of the
//! surrounding transaction.

pub mod games;
pub mod players;

pub use games::GameRepository;
pub use players::PlayerRepository;
