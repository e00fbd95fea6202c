//! Skip/pass handling, turn rotation, and generation rollover.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::game::Game;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::events::GameEvent;
use crate::repos::GameRepository;
use crate::services::validation::ActionValidator;
use crate::state::engine_state::EngineState;
use crate::state::turn::{TurnSnapshot, TurnState};
use crate::txn::operation::Operation;
use crate::txn::transaction::EventLog;

#[derive(Default)]
pub struct TurnFlowService;

impl TurnFlowService {
    pub fn new() -> Self {
        Self
    }

    /// Skip the current player's turn.
    ///
    /// A skip with an untouched action budget is a pass for the whole
    /// generation; otherwise it just ends the turn. Either way the turn
    /// slot rotates to the next unpassed player (whose budget refills),
    /// and when nobody is left the generation advances: passed flags and
    /// activation counters clear, every budget refills, the first player
    /// leads again.
    pub async fn skip_action(
        &self,
        state: &EngineState,
        ctx: &CancellationToken,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<(), EngineError> {
        let session = state.session(game_id)?;
        ActionValidator::new(state.games(), state.players())
            .validate_skip_turn(ctx, &session, player_id)
            .await?;

        let game = state.games().get_by_id(game_id).await?;
        let budget = state.config().actions_per_turn;
        let turn = session.turn(player_id)?;
        let passing = turn.remaining() >= budget;

        let mut passed: Vec<PlayerId> = session
            .turn_states()
            .into_iter()
            .filter(|(_, ts)| ts.has_passed())
            .map(|(pid, _)| pid)
            .collect();
        if passing {
            passed.push(player_id.clone());
        }
        let next = game.next_unpassed_player(player_id, &passed);

        let games = state.games();
        let generation_advanced = next.is_none();
        session
            .manager()
            .execute_atomic(ctx, |txn| {
                let events = txn.events();

                if passing {
                    let fwd_turn = Arc::clone(&turn);
                    let fwd_events = events.clone();
                    let rev_turn = Arc::clone(&turn);
                    txn.push(Operation::new(
                        "mark passed",
                        move || async move {
                            fwd_events.record(fwd_turn.set_passed(true));
                            Ok(())
                        },
                        move || async move {
                            rev_turn.set_passed(false);
                            Ok(())
                        },
                    ));
                }

                match next.clone() {
                    Some(next_player) => {
                        let next_state = session.turn(&next_player)?;
                        let prior: Arc<Mutex<Option<TurnSnapshot>>> = Arc::new(Mutex::new(None));

                        let fwd_games = Arc::clone(&games);
                        let fwd_events = events.clone();
                        let fwd_game_id = game_id.clone();
                        let fwd_state = Arc::clone(&next_state);
                        let fwd_prior = Arc::clone(&prior);
                        let rev_games = Arc::clone(&games);
                        let rev_game_id = game_id.clone();
                        let rev_slot = game.current_turn.clone();

                        txn.push(Operation::new(
                            "advance turn",
                            move || async move {
                                *fwd_prior.lock() = Some(fwd_state.snapshot());
                                fwd_games
                                    .set_current_turn(&fwd_game_id, Some(next_player.clone()))
                                    .await?;
                                fwd_events.record(fwd_state.reset_budget(budget));
                                fwd_events.record_one(GameEvent::TurnChanged {
                                    game_id: fwd_game_id,
                                    current: Some(next_player),
                                });
                                Ok(())
                            },
                            move || async move {
                                rev_games.set_current_turn(&rev_game_id, rev_slot).await?;
                                if let Some(snapshot) = prior.lock().take() {
                                    next_state.restore(snapshot);
                                }
                                Ok(())
                            },
                        ));
                    }
                    None => {
                        txn.push(advance_generation_operation(
                            &games,
                            &game,
                            session.turn_states(),
                            budget,
                            events.clone(),
                        ));
                    }
                }
                Ok(())
            })
            .await?;

        info!(
            game_id = %game_id,
            player_id = %player_id,
            passing,
            generation_advanced,
            "turn skipped"
        );
        Ok(())
    }
}

/// Generation rollover as one reversible operation: bump the generation,
/// reseat the first player, reset every player's turn state. The reverse
/// restores the prior game record and every prior turn snapshot.
fn advance_generation_operation(
    games: &Arc<dyn GameRepository>,
    game: &Game,
    turn_states: Vec<(PlayerId, Arc<TurnState>)>,
    budget: i32,
    events: EventLog,
) -> Operation {
    let prior_game: Arc<Mutex<Option<Game>>> = Arc::new(Mutex::new(None));
    let prior_states: Arc<Mutex<Vec<(PlayerId, TurnSnapshot)>>> = Arc::new(Mutex::new(Vec::new()));
    let first = game.player_ids.first().cloned();

    let fwd_games = Arc::clone(games);
    let fwd_game_id = game.id.clone();
    let fwd_states = turn_states.clone();
    let fwd_prior_game = Arc::clone(&prior_game);
    let fwd_prior_states = Arc::clone(&prior_states);
    let rev_games = Arc::clone(games);
    let rev_states = turn_states;

    Operation::new(
        "advance generation",
        move || async move {
            let mut game = fwd_games.get_by_id(&fwd_game_id).await?;
            *fwd_prior_game.lock() = Some(game.clone());
            let generation = game.generation + 1;
            game.generation = generation;
            game.current_turn = first.clone();
            fwd_games.update(game).await?;

            let mut snapshots = Vec::with_capacity(fwd_states.len());
            for (player_id, turn_state) in &fwd_states {
                snapshots.push((player_id.clone(), turn_state.snapshot()));
                events.record(turn_state.reset_generation(budget));
            }
            *fwd_prior_states.lock() = snapshots;

            events.record_one(GameEvent::GenerationAdvanced {
                game_id: fwd_game_id.clone(),
                generation,
            });
            events.record_one(GameEvent::TurnChanged {
                game_id: fwd_game_id,
                current: first,
            });
            Ok(())
        },
        move || async move {
            let snapshots: Vec<(PlayerId, TurnSnapshot)> =
                prior_states.lock().drain(..).collect();
            for (player_id, snapshot) in snapshots {
                if let Some((_, turn_state)) = rev_states.iter().find(|(id, _)| id == &player_id) {
                    turn_state.restore(snapshot);
                }
            }
            let prior = prior_game.lock().take();
            if let Some(game) = prior {
                rev_games.update(game).await?;
            }
            Ok(())
        },
    )
}
