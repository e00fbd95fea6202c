use async_trait::async_trait;

use crate::domain::player::Player;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn get_by_id(&self, game_id: &GameId, player_id: &PlayerId)
        -> Result<Player, EngineError>;

    async fn insert(&self, game_id: &GameId, player: Player) -> Result<(), EngineError>;

    /// Replace the stored record wholesale.
    async fn update(&self, game_id: &GameId, player: Player) -> Result<(), EngineError>;

    /// All player records for a game, in no particular order; turn order
    /// comes from the game record's `player_ids`.
    async fn all_players(&self, game_id: &GameId) -> Result<Vec<Player>, EngineError>;
}
