use async_trait::async_trait;

use crate::domain::game::Game;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;

#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Fetch a game record by ID; unknown IDs are a validation error.
    async fn get_by_id(&self, game_id: &GameId) -> Result<Game, EngineError>;

    async fn insert(&self, game: Game) -> Result<(), EngineError>;

    /// Replace the stored record wholesale.
    async fn update(&self, game: Game) -> Result<(), EngineError>;

    /// Narrow write for the turn slot, the single most contended field.
    async fn set_current_turn(
        &self,
        game_id: &GameId,
        current: Option<PlayerId>,
    ) -> Result<(), EngineError>;
}
