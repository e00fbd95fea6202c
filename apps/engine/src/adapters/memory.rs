//! In-memory repositories backed by `DashMap`.
//!
//! The shipped adapter for single-process authority, and the test double
//! for everything else. `FailingPlayerRepository` wraps the player store
//! to inject write failures so rollback paths can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::game::Game;
use crate::domain::player::Player;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::repos::{GameRepository, PlayerRepository};

#[derive(Default)]
pub struct InMemoryGameRepository {
    games: DashMap<GameId, Game>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn get_by_id(&self, game_id: &GameId) -> Result<Game, EngineError> {
        self.games
            .get(game_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ValidationError::unknown_game(game_id.clone()).into())
    }

    async fn insert(&self, game: Game) -> Result<(), EngineError> {
        self.games.insert(game.id.clone(), game);
        Ok(())
    }

    async fn update(&self, game: Game) -> Result<(), EngineError> {
        if !self.games.contains_key(&game.id) {
            return Err(ValidationError::unknown_game(game.id).into());
        }
        self.games.insert(game.id.clone(), game);
        Ok(())
    }

    async fn set_current_turn(
        &self,
        game_id: &GameId,
        current: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        let mut entry = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| ValidationError::unknown_game(game_id.clone()))?;
        entry.value_mut().current_turn = current;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: DashMap<(GameId, PlayerId), Player>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn get_by_id(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<Player, EngineError> {
        self.players
            .get(&(game_id.clone(), player_id.clone()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ValidationError::unknown_player(player_id.clone()).into())
    }

    async fn insert(&self, game_id: &GameId, player: Player) -> Result<(), EngineError> {
        self.players
            .insert((game_id.clone(), player.id.clone()), player);
        Ok(())
    }

    async fn update(&self, game_id: &GameId, player: Player) -> Result<(), EngineError> {
        let key = (game_id.clone(), player.id.clone());
        if !self.players.contains_key(&key) {
            return Err(ValidationError::unknown_player(player.id).into());
        }
        self.players.insert(key, player);
        Ok(())
    }

    async fn all_players(&self, game_id: &GameId) -> Result<Vec<Player>, EngineError> {
        Ok(self
            .players
            .iter()
            .filter(|entry| &entry.key().0 == game_id)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

/// Player repository wrapper that can be told to refuse writes, so tests
/// can force a mid-transaction repository failure.
pub struct FailingPlayerRepository {
    inner: Arc<dyn PlayerRepository>,
    fail_writes: AtomicBool,
}

impl FailingPlayerRepository {
    pub fn wrap(inner: Arc<dyn PlayerRepository>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_writes: AtomicBool::new(false),
        })
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), EngineError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EngineError::repo("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for FailingPlayerRepository {
    async fn get_by_id(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<Player, EngineError> {
        self.inner.get_by_id(game_id, player_id).await
    }

    async fn insert(&self, game_id: &GameId, player: Player) -> Result<(), EngineError> {
        self.check_write()?;
        self.inner.insert(game_id, player).await
    }

    async fn update(&self, game_id: &GameId, player: Player) -> Result<(), EngineError> {
        self.check_write()?;
        self.inner.update(game_id, player).await
    }

    async fn all_players(&self, game_id: &GameId) -> Result<Vec<Player>, EngineError> {
        self.inner.all_players(game_id).await
    }
}
