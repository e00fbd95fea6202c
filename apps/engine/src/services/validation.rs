//! Stateless policy evaluation for proposed actions.
//!
//! Validation reads state but never mutates it: it is safe to call
//! repeatedly and concurrently, and two calls with no intervening
//! mutation return the same result.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::resources::{Production, Resources};
use crate::domain::PlayerId;
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::repos::{GameRepository, PlayerRepository};
use crate::state::session::GameSession;

pub struct ActionValidator {
    games: Arc<dyn GameRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl ActionValidator {
    pub fn new(games: Arc<dyn GameRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { games, players }
    }

    /// Checks, in order, each short-circuiting on first failure: game is
    /// active; it is the player's turn; the player has actions left; every
    /// cost dimension is covered.
    pub async fn validate(
        &self,
        ctx: &CancellationToken,
        session: &GameSession,
        player_id: &PlayerId,
        cost: &Resources,
    ) -> Result<(), EngineError> {
        self.validate_inner(ctx, session, player_id, cost, true).await
    }

    /// Like [`ActionValidator::validate`] minus the action-budget check:
    /// pass/skip is legal even at zero remaining actions.
    pub async fn validate_skip_turn(
        &self,
        ctx: &CancellationToken,
        session: &GameSession,
        player_id: &PlayerId,
    ) -> Result<(), EngineError> {
        self.validate_inner(ctx, session, player_id, &Resources::default(), false)
            .await
    }

    async fn validate_inner(
        &self,
        ctx: &CancellationToken,
        session: &GameSession,
        player_id: &PlayerId,
        cost: &Resources,
        check_budget: bool,
    ) -> Result<(), EngineError> {
        if ctx.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let game = self.games.get_by_id(session.game_id()).await?;

        if !game.is_active() {
            warn!(game_id = %game.id, status = %game.status, "action attempted on non-active game");
            return Err(ValidationError::GameNotActive {
                status: game.status,
            }
            .into());
        }

        if game.current_turn.as_ref() != Some(player_id) {
            warn!(
                game_id = %game.id,
                player_id = %player_id,
                current_turn = game.current_turn.as_deref().unwrap_or("none"),
                "action attempted out of turn"
            );
            return Err(ValidationError::NotPlayersTurn {
                current: game.current_turn,
            }
            .into());
        }

        if check_budget {
            let remaining = session.turn(player_id)?.remaining();
            if remaining <= 0 {
                warn!(game_id = %game.id, player_id = %player_id, "no remaining actions");
                return Err(ValidationError::NoActionsRemaining.into());
            }
        }

        if !cost.is_zero() {
            let held = session.ledger(player_id)?.snapshot();
            if let Some((kind, required, available)) = held.first_shortfall(cost) {
                warn!(
                    game_id = %game.id,
                    player_id = %player_id,
                    resource = %kind,
                    required,
                    available,
                    "insufficient resources"
                );
                return Err(ValidationError::InsufficientResources {
                    kind,
                    required,
                    available,
                }
                .into());
            }
        }

        debug!(game_id = %game.id, player_id = %player_id, "action validation passed");
        Ok(())
    }

    /// Check that the player's production covers `required` in every
    /// dimension (for effects that reduce production).
    pub async fn validate_production(
        &self,
        ctx: &CancellationToken,
        session: &GameSession,
        player_id: &PlayerId,
        required: &Production,
    ) -> Result<(), EngineError> {
        if ctx.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let player = self
            .players
            .get_by_id(session.game_id(), player_id)
            .await?;
        if let Some((kind, required, available)) = player.production.first_shortfall(required) {
            return Err(ValidationError::InsufficientProduction {
                kind,
                required,
                available,
            }
            .into());
        }
        Ok(())
    }
}
