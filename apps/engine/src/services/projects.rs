//! Standard projects: fixed-price actions available to every player.
//!
//! Each project is one atomic transaction: deduct the cost, apply the
//! effect, consume one action. Validation happens against a read-only
//! snapshot before any operation runs.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::resources::{Production, Resources};
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::repos::PlayerRepository;
use crate::services::validation::ActionValidator;
use crate::state::engine_state::EngineState;
use crate::txn::ops;

pub const AQUIFER_COST: i32 = 18;
pub const ASTEROID_COST: i32 = 14;
pub const POWER_PLANT_COST: i32 = 11;
/// Credits received per patent sold.
pub const PATENT_PRICE: i32 = 1;

#[derive(Default)]
pub struct StandardProjectService;

impl StandardProjectService {
    pub fn new() -> Self {
        Self
    }

    /// Build aquifer: 18 credits for an ocean tile plus the rating bonus.
    pub async fn build_aquifer(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let cost = Resources::credits(AQUIFER_COST);
        self.validator(state)
            .validate(ctx, &session, player_id, &cost)
            .await?;

        let players = state.players();
        session
            .manager()
            .execute_atomic(ctx, |txn| {
                ops::debit_resources(txn, &session, player_id, cost)?;
                ops::place_ocean_with_bonus(txn, &session, &players, player_id);
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, "aquifer built");
        Ok(())
    }

    /// Launch asteroid: 14 credits for one temperature step plus the
    /// rating bonus.
    pub async fn launch_asteroid(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let cost = Resources::credits(ASTEROID_COST);
        self.validator(state)
            .validate(ctx, &session, player_id, &cost)
            .await?;

        let players = state.players();
        session
            .manager()
            .execute_atomic(ctx, |txn| {
                ops::debit_resources(txn, &session, player_id, cost)?;
                ops::raise_temperature_with_bonus(txn, &session, &players, player_id, 1);
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, "asteroid launched");
        Ok(())
    }

    /// Power plant: 11 credits for one step of energy production.
    pub async fn build_power_plant(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let cost = Resources::credits(POWER_PLANT_COST);
        self.validator(state)
            .validate(ctx, &session, player_id, &cost)
            .await?;

        let players = state.players();
        session
            .manager()
            .execute_atomic(ctx, |txn| {
                ops::debit_resources(txn, &session, player_id, cost)?;
                ops::add_production(
                    txn,
                    &players,
                    game_id,
                    player_id,
                    Production {
                        energy: 1,
                        ..Production::default()
                    },
                );
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, "power plant built");
        Ok(())
    }

    /// Sell patents: discard cards from hand for one credit each.
    pub async fn sell_patents(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
        cards: Vec<String>,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        self.validator(state)
            .validate(ctx, &session, player_id, &Resources::default())
            .await?;

        // Ownership is checked before any operation runs so the common
        // failure is a clean rejection, not a rollback.
        let player = state.players().get_by_id(game_id, player_id).await?;
        for card in &cards {
            if !player.holds_card(card) {
                return Err(ValidationError::CardNotInHand { card: card.clone() }.into());
            }
        }

        let payout = Resources::credits(PATENT_PRICE * cards.len() as i32);
        let players = state.players();
        let sold = cards.len();
        session
            .manager()
            .execute_atomic(ctx, |txn| {
                ops::discard_cards(txn, &players, game_id, player_id, cards);
                ops::credit_resources(txn, &session, player_id, payout)?;
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, sold, "patents sold");
        Ok(())
    }

    fn validator(&self, state: &EngineState) -> ActionValidator {
        ActionValidator::new(state.games(), state.players())
    }
}
