//! Repository adapters. Only the in-memory one ships with the core; a
//! persistent backing would implement the same traits elsewhere.

pub mod memory;

pub use memory::{FailingPlayerRepository, InMemoryGameRepository, InMemoryPlayerRepository};
