//! Reversible operations, transactions, and the atomic-execution manager.
//!
//! Every player-initiated mutation of shared game/player state passes
//! through [`TransactionManager::execute_atomic`]: operations run in
//! append order, the first failure rolls back the applied prefix in
//! strict reverse order, and the events the operations recorded are
//! published only after a full commit, with no state lock held.

pub mod manager;
pub mod operation;
pub mod ops;
pub mod transaction;

#[cfg(test)]
mod tests_transaction;

pub use manager::TransactionManager;
pub use operation::Operation;
pub use transaction::{EventLog, Transaction};
