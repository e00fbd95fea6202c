//! Per-game live state: the guarded components, the event bus, and the
//! transaction manager that ties them together.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::EngineConfig;
use crate::domain::resources::Resources;
use crate::domain::{GameId, PlayerId};
use crate::errors::validation::ValidationError;
use crate::events::bus::EventBus;
use crate::state::ledger::ResourceLedger;
use crate::state::parameters::GlobalParameters;
use crate::state::turn::TurnState;
use crate::txn::manager::TransactionManager;

/// Live in-process state for one game.
///
/// Created at game creation, grows a ledger and turn component per
/// joining player, dropped with the game. Components are handed out as
/// `Arc`s so operation closures can capture them; mutation still only
/// happens through each component's own lock.
pub struct GameSession {
    game_id: GameId,
    bus: Arc<EventBus>,
    manager: TransactionManager,
    parameters: Arc<GlobalParameters>,
    ledgers: DashMap<PlayerId, Arc<ResourceLedger>>,
    turns: DashMap<PlayerId, Arc<TurnState>>,
}

impl GameSession {
    pub fn new(game_id: GameId, config: &EngineConfig) -> Arc<Self> {
        let bus = Arc::new(EventBus::new());
        let manager = TransactionManager::new(
            game_id.clone(),
            Arc::clone(&bus),
            config.event_log_capacity,
        );
        Arc::new(Self {
            parameters: Arc::new(GlobalParameters::new(game_id.clone())),
            game_id,
            bus,
            manager,
            ledgers: DashMap::new(),
            turns: DashMap::new(),
        })
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn manager(&self) -> &TransactionManager {
        &self.manager
    }

    pub fn parameters(&self) -> &Arc<GlobalParameters> {
        &self.parameters
    }

    pub fn add_player(&self, player_id: &PlayerId, starting: Resources, budget: i32) {
        self.ledgers.insert(
            player_id.clone(),
            Arc::new(ResourceLedger::new(
                self.game_id.clone(),
                player_id.clone(),
                starting,
            )),
        );
        self.turns.insert(
            player_id.clone(),
            Arc::new(TurnState::new(
                self.game_id.clone(),
                player_id.clone(),
                budget,
            )),
        );
    }

    pub fn ledger(&self, player_id: &PlayerId) -> Result<Arc<ResourceLedger>, ValidationError> {
        self.ledgers
            .get(player_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ValidationError::unknown_player(player_id.clone()))
    }

    pub fn turn(&self, player_id: &PlayerId) -> Result<Arc<TurnState>, ValidationError> {
        self.turns
            .get(player_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ValidationError::unknown_player(player_id.clone()))
    }

    /// Every player's turn component (generation rollover touches all).
    pub fn turn_states(&self) -> Vec<(PlayerId, Arc<TurnState>)> {
        self.turns
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }
}
