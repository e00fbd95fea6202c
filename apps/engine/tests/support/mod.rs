#![allow(dead_code)] // Each test binary uses a different helper subset.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use engine::adapters::memory::{
    FailingPlayerRepository, InMemoryGameRepository, InMemoryPlayerRepository,
};
use engine::prelude::*;
use engine::repos::{GameRepository, PlayerRepository};
use engine::state::Parameters;
use engine_test_support::unique_helpers::unique_name;

#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}

/// A started game with its engine state and joined players, plus a
/// cancellation token tests can trip.
pub struct TestGame {
    pub state: EngineState,
    pub game_id: GameId,
    pub players: Vec<PlayerId>,
    pub ctx: CancellationToken,
}

pub async fn started_game(player_count: usize) -> TestGame {
    started_game_with(EngineConfig::default(), player_count).await
}

pub async fn started_game_with(config: EngineConfig, player_count: usize) -> TestGame {
    let state = EngineState::in_memory(config);
    start(state, player_count).await
}

/// Like [`started_game_with`] but with a player repository whose writes
/// can be told to fail, for exercising rollback.
pub async fn started_game_with_failing_players(
    config: EngineConfig,
    player_count: usize,
) -> (TestGame, Arc<FailingPlayerRepository>) {
    let failing = FailingPlayerRepository::wrap(Arc::new(InMemoryPlayerRepository::new()));
    let state = EngineState::new(
        Arc::new(InMemoryGameRepository::new()),
        Arc::clone(&failing) as Arc<dyn PlayerRepository>,
        config,
    );
    (start(state, player_count).await, failing)
}

async fn start(state: EngineState, player_count: usize) -> TestGame {
    let service = GameService::new();
    let game_id = service
        .create_game(&state, &unique_name("game"))
        .await
        .unwrap();

    let mut players = Vec::with_capacity(player_count);
    for i in 0..player_count {
        players.push(
            service
                .join_game(&state, &game_id, &format!("player-{i}"))
                .await
                .unwrap(),
        );
    }

    let ctx = CancellationToken::new();
    service.start_game(&state, &ctx, &game_id).await.unwrap();

    TestGame {
        state,
        game_id,
        players,
        ctx,
    }
}

impl TestGame {
    pub fn session(&self) -> Arc<GameSession> {
        self.state.session(&self.game_id).unwrap()
    }

    pub fn resources(&self, player: &PlayerId) -> Resources {
        self.session().ledger(player).unwrap().snapshot()
    }

    pub fn credits(&self, player: &PlayerId) -> i32 {
        self.resources(player).credits
    }

    pub fn budget(&self, player: &PlayerId) -> i32 {
        self.session().turn(player).unwrap().remaining()
    }

    pub fn parameters(&self) -> Parameters {
        self.session().parameters().snapshot()
    }

    pub fn give_resources(&self, player: &PlayerId, gain: Resources) {
        self.session().ledger(player).unwrap().credit(&gain);
    }

    /// Fill the ocean track to its maximum.
    pub fn max_out_oceans(&self) {
        while self.session().parameters().place_ocean().0 {}
    }

    pub async fn player(&self, player: &PlayerId) -> Player {
        self.state
            .players()
            .get_by_id(&self.game_id, player)
            .await
            .unwrap()
    }

    pub async fn rating(&self, player: &PlayerId) -> i32 {
        self.player(player).await.terraform_rating
    }

    pub async fn give_cards(&self, player: &PlayerId, cards: &[&str]) {
        let mut record = self.player(player).await;
        record.hand.extend(cards.iter().map(|c| c.to_string()));
        self.state
            .players()
            .update(&self.game_id, record)
            .await
            .unwrap();
    }

    pub async fn current_turn(&self) -> Option<PlayerId> {
        self.state
            .games()
            .get_by_id(&self.game_id)
            .await
            .unwrap()
            .current_turn
    }

    pub async fn generation(&self) -> u32 {
        self.state
            .games()
            .get_by_id(&self.game_id)
            .await
            .unwrap()
            .generation
    }
}
