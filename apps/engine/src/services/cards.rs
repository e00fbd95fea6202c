//! Playing cards and activating card actions through the effect
//! registry.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{GameId, PlayerId};
use crate::effects::{registration_operation, EffectContext, EffectHandler};
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::events::GameEvent;
use crate::repos::PlayerRepository;
use crate::services::validation::ActionValidator;
use crate::state::engine_state::EngineState;
use crate::txn::operation::Operation;
use crate::txn::ops;

#[derive(Default)]
pub struct CardService;

impl CardService {
    pub fn new() -> Self {
        Self
    }

    /// Play a card from hand: pay its cost, apply its on-play behavior
    /// (or register its reactive behavior), move it into play, consume an
    /// action.
    pub async fn play_card(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
        card: &str,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let handler = state.effects().dispatch(card)?;
        let cost = match &handler {
            EffectHandler::Play(h) => h.cost(),
            EffectHandler::Activate(h) => h.cost(),
            EffectHandler::Event(h) => h.cost(),
        };

        ActionValidator::new(state.games(), state.players())
            .validate(ctx, &session, player_id, &cost)
            .await?;

        let player = state.players().get_by_id(game_id, player_id).await?;
        if !player.holds_card(card) {
            return Err(ValidationError::CardNotInHand {
                card: card.to_string(),
            }
            .into());
        }

        let players = state.players();
        let games = state.games();
        let effect_ctx = EffectContext {
            game_id: game_id.clone(),
            player_id: player_id.clone(),
            session: Arc::clone(&session),
            games,
            players: Arc::clone(&players),
        };

        session
            .manager()
            .execute_atomic(ctx, |txn| {
                ops::debit_resources(txn, &session, player_id, cost)?;
                match &handler {
                    EffectHandler::Play(h) => h.build(&effect_ctx, txn)?,
                    // Activation cards contribute nothing at play time;
                    // their behavior runs through `activate_card`.
                    EffectHandler::Activate(_) => {}
                    EffectHandler::Event(h) => {
                        txn.push(registration_operation(Arc::clone(h), effect_ctx.clone()));
                    }
                }
                ops::move_card_to_played(txn, &players, game_id, player_id, card);
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, card, "card played");
        Ok(())
    }

    /// Use a played card's action: once per generation, pay the
    /// activation cost, apply the behavior, consume an action.
    pub async fn activate_card(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
        card: &str,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        let handler = state.effects().on_activate(card)?;
        let activation_cost = handler.activation_cost();

        ActionValidator::new(state.games(), state.players())
            .validate(ctx, &session, player_id, &activation_cost)
            .await?;

        let player = state.players().get_by_id(game_id, player_id).await?;
        if !player.played_cards.iter().any(|c| c == card) {
            return Err(ValidationError::CardNotPlayed {
                card: card.to_string(),
            }
            .into());
        }

        let players = state.players();
        let games = state.games();
        let effect_ctx = EffectContext {
            game_id: game_id.clone(),
            player_id: player_id.clone(),
            session: Arc::clone(&session),
            games,
            players,
        };
        let turn = session.turn(player_id)?;
        let effect_id = card.to_string();

        session
            .manager()
            .execute_atomic(ctx, |txn| {
                // The once-per-generation gate is itself an operation, so
                // a downstream failure reopens it.
                let events = txn.events();
                let fwd_turn = Arc::clone(&turn);
                let fwd_id = effect_id.clone();
                let fwd_events = events.clone();
                let fwd_game_id = game_id.clone();
                let fwd_player_id = player_id.clone();
                let rev_turn = Arc::clone(&turn);
                let rev_id = effect_id.clone();
                txn.push(Operation::new(
                    "note activation",
                    move || async move {
                        fwd_turn.note_activation(&fwd_id)?;
                        fwd_events.record_one(GameEvent::EffectActivated {
                            game_id: fwd_game_id,
                            player_id: fwd_player_id,
                            effect_id: fwd_id,
                        });
                        Ok(())
                    },
                    move || async move {
                        rev_turn.clear_activation(&rev_id);
                        Ok(())
                    },
                ));

                ops::debit_resources(txn, &session, player_id, activation_cost)?;
                handler.build(&effect_ctx, txn)?;
                ops::consume_action(txn, &session, player_id)?;
                Ok(())
            })
            .await?;

        info!(game_id = %game_id, player_id = %player_id, card, "card action used");
        Ok(())
    }
}
