//! Standard operation builders shared by services and effect handlers.
//!
//! Each builder appends one reversible operation to a transaction. The
//! closures capture `Arc` handles to the guarded components and
//! repositories they touch plus the transaction's [`EventLog`]; where a
//! reverse needs data only the forward can know (actual clamped steps,
//! the prior record), the pair shares a small cell.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::resources::{Production, Resources};
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::errors::validation::ValidationError;
use crate::events::GameEvent;
use crate::repos::PlayerRepository;
use crate::state::session::GameSession;
use crate::txn::operation::Operation;
use crate::txn::transaction::{EventLog, Transaction};

/// Deduct `cost` from the player's ledger; reverse credits it back.
pub fn debit_resources(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    player_id: &PlayerId,
    cost: Resources,
) -> Result<(), EngineError> {
    let ledger = session.ledger(player_id)?;
    let events = txn.events();

    let fwd_ledger = Arc::clone(&ledger);
    let fwd_events = events.clone();
    txn.push(Operation::new(
        "deduct resources",
        move || async move {
            fwd_events.record(fwd_ledger.debit(&cost)?);
            Ok(())
        },
        move || async move {
            // Events from a rolled-back transaction are discarded, so the
            // credit's events are dropped on the floor.
            let _ = ledger.credit(&cost);
            Ok(())
        },
    ));
    Ok(())
}

/// Credit `gain` to the player's ledger; reverse debits it back.
pub fn credit_resources(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    player_id: &PlayerId,
    gain: Resources,
) -> Result<(), EngineError> {
    let ledger = session.ledger(player_id)?;
    let events = txn.events();

    let fwd_ledger = Arc::clone(&ledger);
    txn.push(Operation::new(
        "credit resources",
        move || async move {
            events.record(fwd_ledger.credit(&gain));
            Ok(())
        },
        move || async move {
            ledger.debit(&gain)?;
            Ok(())
        },
    ));
    Ok(())
}

/// Spend one action from the player's budget; reverse restores it.
pub fn consume_action(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    player_id: &PlayerId,
) -> Result<(), EngineError> {
    let turn = session.turn(player_id)?;
    let events = txn.events();

    let fwd_turn = Arc::clone(&turn);
    let fwd_events = events.clone();
    txn.push(Operation::new(
        "consume action",
        move || async move {
            fwd_events.record(fwd_turn.consume_action()?);
            Ok(())
        },
        move || async move {
            let _ = turn.restore_action();
            Ok(())
        },
    ));
    Ok(())
}

/// Place an ocean tile and award the terraform-rating bonus.
///
/// The rating bonus is granted even when the ocean count is already at
/// its maximum (the placement itself becomes a no-op); the reverse undoes
/// exactly what the forward did.
pub fn place_ocean_with_bonus(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    players: &Arc<dyn PlayerRepository>,
    player_id: &PlayerId,
) {
    let parameters = Arc::clone(session.parameters());
    let game_id = session.game_id().clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let events = txn.events();
    let placed = Arc::new(Mutex::new(false));

    let fwd_parameters = Arc::clone(&parameters);
    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_placed = Arc::clone(&placed);
    txn.push(Operation::new(
        "place ocean",
        move || async move {
            let (did_place, ev) = fwd_parameters.place_ocean();
            // Keep the operation itself atomic: if the rating write
            // fails, take the tile back before surfacing the error.
            if let Err(err) =
                adjust_rating(&fwd_players, &fwd_game_id, &fwd_player_id, 1, Some(&events)).await
            {
                if did_place {
                    fwd_parameters.remove_ocean();
                }
                return Err(err);
            }
            *fwd_placed.lock() = did_place;
            events.record(ev);
            Ok(())
        },
        move || async move {
            adjust_rating(&players, &game_id, &player_id, -1, None).await?;
            if *placed.lock() {
                parameters.remove_ocean();
            }
            Ok(())
        },
    ));
}

/// Raise the temperature by `steps`, awarding one rating per step
/// actually applied after clamping.
pub fn raise_temperature_with_bonus(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    players: &Arc<dyn PlayerRepository>,
    player_id: &PlayerId,
    steps: i32,
) {
    let parameters = Arc::clone(session.parameters());
    let game_id = session.game_id().clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let events = txn.events();
    let applied = Arc::new(Mutex::new(0));

    let fwd_parameters = Arc::clone(&parameters);
    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_applied = Arc::clone(&applied);
    txn.push(Operation::new(
        "raise temperature",
        move || async move {
            let (actual, ev) = fwd_parameters.raise_temperature(steps);
            if actual > 0 {
                if let Err(err) =
                    adjust_rating(&fwd_players, &fwd_game_id, &fwd_player_id, actual, Some(&events))
                        .await
                {
                    fwd_parameters.raise_temperature(-actual);
                    return Err(err);
                }
            }
            *fwd_applied.lock() = actual;
            events.record(ev);
            Ok(())
        },
        move || async move {
            let actual = *applied.lock();
            if actual > 0 {
                adjust_rating(&players, &game_id, &player_id, -actual, None).await?;
            }
            parameters.raise_temperature(-actual);
            Ok(())
        },
    ));
}

/// Raise oxygen by `steps`, awarding one rating per step actually applied
/// after clamping.
pub fn raise_oxygen_with_bonus(
    txn: &mut Transaction,
    session: &Arc<GameSession>,
    players: &Arc<dyn PlayerRepository>,
    player_id: &PlayerId,
    steps: i32,
) {
    let parameters = Arc::clone(session.parameters());
    let game_id = session.game_id().clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let events = txn.events();
    let applied = Arc::new(Mutex::new(0));

    let fwd_parameters = Arc::clone(&parameters);
    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_applied = Arc::clone(&applied);
    txn.push(Operation::new(
        "raise oxygen",
        move || async move {
            let (actual, ev) = fwd_parameters.raise_oxygen(steps);
            if actual > 0 {
                if let Err(err) =
                    adjust_rating(&fwd_players, &fwd_game_id, &fwd_player_id, actual, Some(&events))
                        .await
                {
                    fwd_parameters.raise_oxygen(-actual);
                    return Err(err);
                }
            }
            *fwd_applied.lock() = actual;
            events.record(ev);
            Ok(())
        },
        move || async move {
            let actual = *applied.lock();
            if actual > 0 {
                adjust_rating(&players, &game_id, &player_id, -actual, None).await?;
            }
            parameters.raise_oxygen(-actual);
            Ok(())
        },
    ));
}

/// Adjust the player's production, flooring each dimension at zero; the
/// reverse restores the exact prior vector.
pub fn add_production(
    txn: &mut Transaction,
    players: &Arc<dyn PlayerRepository>,
    game_id: &GameId,
    player_id: &PlayerId,
    delta: Production,
) {
    let game_id = game_id.clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let events = txn.events();
    let prior: Arc<Mutex<Option<Production>>> = Arc::new(Mutex::new(None));

    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_prior = Arc::clone(&prior);
    txn.push(Operation::new(
        "adjust production",
        move || async move {
            let mut player = fwd_players.get_by_id(&fwd_game_id, &fwd_player_id).await?;
            *fwd_prior.lock() = Some(player.production);
            player.production.add_clamped(&delta);
            let production = player.production;
            fwd_players.update(&fwd_game_id, player).await?;
            events.record_one(GameEvent::ProductionChanged {
                game_id: fwd_game_id,
                player_id: fwd_player_id,
                production,
            });
            Ok(())
        },
        move || async move {
            let Some(prior) = *prior.lock() else {
                return Ok(());
            };
            let mut player = players.get_by_id(&game_id, &player_id).await?;
            player.production = prior;
            players.update(&game_id, player).await
        },
    ));
}

/// Move a card from the player's hand into their played cards.
pub fn move_card_to_played(
    txn: &mut Transaction,
    players: &Arc<dyn PlayerRepository>,
    game_id: &GameId,
    player_id: &PlayerId,
    card: &str,
) {
    let game_id = game_id.clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let card = card.to_string();
    let events = txn.events();

    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_card = card.clone();
    txn.push(Operation::new(
        "play card from hand",
        move || async move {
            let mut player = fwd_players.get_by_id(&fwd_game_id, &fwd_player_id).await?;
            let Some(pos) = player.hand.iter().position(|c| c == &fwd_card) else {
                return Err(ValidationError::CardNotInHand { card: fwd_card }.into());
            };
            player.hand.remove(pos);
            player.played_cards.push(fwd_card.clone());
            fwd_players.update(&fwd_game_id, player).await?;
            events.record_one(GameEvent::CardPlayed {
                game_id: fwd_game_id,
                player_id: fwd_player_id,
                card: fwd_card,
            });
            Ok(())
        },
        move || async move {
            let mut player = players.get_by_id(&game_id, &player_id).await?;
            player.played_cards.retain(|c| c != &card);
            player.hand.push(card.clone());
            players.update(&game_id, player).await
        },
    ));
}

/// Remove `cards` from the player's hand (sell patents); the reverse puts
/// the exact prior hand back.
pub fn discard_cards(
    txn: &mut Transaction,
    players: &Arc<dyn PlayerRepository>,
    game_id: &GameId,
    player_id: &PlayerId,
    cards: Vec<String>,
) {
    let game_id = game_id.clone();
    let player_id = player_id.clone();
    let players = Arc::clone(players);
    let prior_hand: Arc<Mutex<Option<Vec<String>>>> = Arc::new(Mutex::new(None));

    let fwd_players = Arc::clone(&players);
    let fwd_game_id = game_id.clone();
    let fwd_player_id = player_id.clone();
    let fwd_prior = Arc::clone(&prior_hand);
    txn.push(Operation::new(
        "discard cards",
        move || async move {
            let mut player = fwd_players.get_by_id(&fwd_game_id, &fwd_player_id).await?;
            for card in &cards {
                if !player.holds_card(card) {
                    return Err(ValidationError::CardNotInHand { card: card.clone() }.into());
                }
            }
            *fwd_prior.lock() = Some(player.hand.clone());
            player.hand.retain(|c| !cards.contains(c));
            // Hand contents are player-private; no event is emitted here.
            fwd_players.update(&fwd_game_id, player).await?;
            Ok(())
        },
        move || async move {
            let Some(prior) = prior_hand.lock().take() else {
                return Ok(());
            };
            let mut player = players.get_by_id(&game_id, &player_id).await?;
            player.hand = prior;
            players.update(&game_id, player).await
        },
    ));
}

/// Read-modify-write of the terraform rating through the player
/// repository. Rollback paths pass `events: None` since a rolled-back
/// transaction's events are never published.
async fn adjust_rating(
    players: &Arc<dyn PlayerRepository>,
    game_id: &GameId,
    player_id: &PlayerId,
    delta: i32,
    events: Option<&EventLog>,
) -> Result<(), EngineError> {
    let mut player = players.get_by_id(game_id, player_id).await?;
    let old = player.terraform_rating;
    player.terraform_rating = old + delta;
    players.update(game_id, player).await?;
    if let Some(events) = events {
        events.record_one(GameEvent::TerraformRatingChanged {
            game_id: game_id.clone(),
            player_id: player_id.clone(),
            old,
            new: old + delta,
        });
    }
    Ok(())
}
