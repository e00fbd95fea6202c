//! Domain layer: plain data records shared across the engine.

pub mod game;
pub mod player;
pub mod resources;

/// Games and players are addressed by opaque string IDs (UUID v4 in
/// practice; tests use readable literals).
pub type GameId = String;
pub type PlayerId = String;

// Re-exports for ergonomics
pub use game::{Game, GameStatus};
pub use player::Player;
pub use resources::{Production, ResourceKind, Resources};
