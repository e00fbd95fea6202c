//! Game lifecycle: create, join, start.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::domain::game::{Game, GameStatus};
use crate::domain::player::Player;
use crate::domain::resources::Resources;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::events::GameEvent;
use crate::repos::{GameRepository, PlayerRepository};
use crate::state::engine_state::EngineState;
use crate::state::session::GameSession;
use crate::txn::operation::Operation;

#[derive(Default)]
pub struct GameService;

impl GameService {
    pub fn new() -> Self {
        Self
    }

    /// Create a game in lobby status with a fresh live session.
    pub async fn create_game(
        &self,
        state: &EngineState,
        name: &str,
    ) -> Result<GameId, EngineError> {
        let game_id: GameId = Uuid::new_v4().to_string();
        state
            .games()
            .insert(Game::new(game_id.clone(), name))
            .await?;
        state.register_session(GameSession::new(game_id.clone(), state.config()));
        info!(game_id = %game_id, name, "game created");
        Ok(game_id)
    }

    /// Add a player to a lobby game. The player starts with the
    /// configured credits and an empty action budget; budgets are granted
    /// when a turn starts.
    pub async fn join_game(
        &self,
        state: &EngineState,
        game_id: &GameId,
        player_name: &str,
    ) -> Result<PlayerId, EngineError> {
        let session = state.session(game_id)?;
        let mut game = state.games().get_by_id(game_id).await?;

        if game.status != GameStatus::Lobby {
            return Err(ValidationError::GameAlreadyStarted.into());
        }
        let capacity = state.config().max_players;
        if game.player_ids.len() >= capacity {
            return Err(ValidationError::GameFull { capacity }.into());
        }

        let player_id: PlayerId = Uuid::new_v4().to_string();
        state
            .players()
            .insert(game_id, Player::new(player_id.clone(), player_name))
            .await?;
        game.player_ids.push(player_id.clone());
        state.games().update(game).await?;

        session.add_player(
            &player_id,
            Resources::credits(state.config().starting_credits),
            0,
        );

        info!(game_id = %game_id, player_id = %player_id, "player joined");
        session.bus().publish(&GameEvent::PlayerJoined {
            game_id: game_id.clone(),
            player_id: player_id.clone(),
            name: player_name.to_string(),
        });
        session.bus().publish(&GameEvent::BroadcastRequested {
            game_id: game_id.clone(),
            player_ids: None,
        });
        Ok(player_id)
    }

    /// Activate a lobby game and hand the first turn to the first player
    /// who joined.
    pub async fn start_game(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let games = state.games();
        let budget = state.config().actions_per_turn;

        session
            .manager()
            .execute_atomic(ctx, |txn| {
                let events = txn.events();
                let prior: Arc<Mutex<Option<Game>>> = Arc::new(Mutex::new(None));

                // Lobby -> Active, first player seated, their budget
                // granted; the reverse restores the full prior record.
                let fwd_games = Arc::clone(&games);
                let fwd_session = Arc::clone(&session);
                let fwd_game_id = game_id.clone();
                let fwd_prior = Arc::clone(&prior);
                let rev_games = Arc::clone(&games);
                let rev_session = Arc::clone(&session);

                txn.push(Operation::new(
                    "activate game",
                    move || async move {
                        let mut game = fwd_games.get_by_id(&fwd_game_id).await?;
                        if game.status != GameStatus::Lobby {
                            return Err(ValidationError::GameAlreadyStarted.into());
                        }
                        let Some(first) = game.player_ids.first().cloned() else {
                            return Err(ValidationError::NoPlayers.into());
                        };
                        *fwd_prior.lock() = Some(game.clone());

                        game.status = GameStatus::Active;
                        game.current_turn = Some(first.clone());
                        fwd_games.update(game).await?;
                        events.record(fwd_session.turn(&first)?.reset_budget(budget));
                        events.record_one(GameEvent::TurnChanged {
                            game_id: fwd_game_id,
                            current: Some(first),
                        });
                        Ok(())
                    },
                    move || async move {
                        let Some(prior_game) = prior.lock().take() else {
                            return Ok(());
                        };
                        if let Some(first) = prior_game.player_ids.first() {
                            rev_session.turn(first)?.reset_budget(0);
                        }
                        rev_games.update(prior_game).await
                    },
                ));
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, "game started");
        Ok(())
    }
}
