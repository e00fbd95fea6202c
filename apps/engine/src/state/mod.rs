//! Guarded state components: each unit of shared mutable state owns its
//! lock and never leaks it.
//!
//! Lock discipline: a mutation holds exactly one component lock, only for
//! the duration of a pure in-memory transition (no I/O, no publication).
//! Mutations return the events they produced; the orchestrating caller
//! publishes after every lock is released. When an action must touch
//! several components it does so through sequential operations, game-level
//! parameters before player-level components, so no two locks are ever
//! held at once.

pub mod engine_state;
pub mod guarded;
pub mod ledger;
pub mod parameters;
pub mod session;
pub mod turn;

#[cfg(test)]
mod tests_parameters;
#[cfg(test)]
mod tests_turn;

pub use engine_state::EngineState;
pub use guarded::Guarded;
pub use ledger::ResourceLedger;
pub use parameters::{GlobalParameters, Parameters};
pub use session::GameSession;
pub use turn::TurnState;
