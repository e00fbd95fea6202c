use std::sync::Arc;

use dashmap::DashMap;

use crate::adapters::memory::{InMemoryGameRepository, InMemoryPlayerRepository};
use crate::config::EngineConfig;
use crate::domain::GameId;
use crate::effects::EffectRegistry;
use crate::errors::validation::ValidationError;
use crate::repos::{GameRepository, PlayerRepository};
use crate::state::session::GameSession;

/// Engine-wide shared state: repositories, configuration, the effect
/// registry, and the live session for each game.
#[derive(Clone)]
pub struct EngineState {
    games: Arc<dyn GameRepository>,
    players: Arc<dyn PlayerRepository>,
    config: EngineConfig,
    effects: Arc<EffectRegistry>,
    sessions: Arc<DashMap<GameId, Arc<GameSession>>>,
}

impl EngineState {
    pub fn new(
        games: Arc<dyn GameRepository>,
        players: Arc<dyn PlayerRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            games,
            players,
            config,
            effects: Arc::new(EffectRegistry::with_standard_effects()),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Engine state over the in-memory adapters.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(
            Arc::new(InMemoryGameRepository::new()),
            Arc::new(InMemoryPlayerRepository::new()),
            config,
        )
    }

    pub fn games(&self) -> Arc<dyn GameRepository> {
        Arc::clone(&self.games)
    }

    pub fn players(&self) -> Arc<dyn PlayerRepository> {
        Arc::clone(&self.players)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn effects(&self) -> Arc<EffectRegistry> {
        Arc::clone(&self.effects)
    }

    pub fn register_session(&self, session: Arc<GameSession>) {
        self.sessions.insert(session.game_id().clone(), session);
    }

    pub fn session(&self, game_id: &GameId) -> Result<Arc<GameSession>, ValidationError> {
        self.sessions
            .get(game_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ValidationError::unknown_game(game_id.clone()))
    }

    pub fn drop_session(&self, game_id: &GameId) {
        self.sessions.remove(game_id);
    }
}
