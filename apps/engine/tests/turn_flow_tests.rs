//! Skip/pass semantics, turn rotation, and generation rollover.

mod support;

use engine::prelude::*;

use support::started_game;

#[tokio::test]
async fn skip_with_untouched_budget_passes_for_the_generation() {
    let game = started_game(3).await;
    let (p0, p1) = (game.players[0].clone(), game.players[1].clone());

    TurnFlowService::new()
        .skip_action(&game.state, &game.ctx, &game.game_id, &p0)
        .await
        .unwrap();

    assert!(game.session().turn(&p0).unwrap().has_passed());
    assert_eq!(game.current_turn().await, Some(p1.clone()));
    // The incoming player's budget is granted on rotation.
    assert_eq!(game.budget(&p1), game.state.config().actions_per_turn);
}

#[tokio::test]
async fn skip_after_acting_ends_turn_without_passing() {
    let game = started_game(3).await;
    let (p0, p1) = (game.players[0].clone(), game.players[1].clone());

    // Spend one action first.
    game.session().turn(&p0).unwrap().consume_action().unwrap();
    TurnFlowService::new()
        .skip_action(&game.state, &game.ctx, &game.game_id, &p0)
        .await
        .unwrap();

    assert!(!game.session().turn(&p0).unwrap().has_passed());
    assert_eq!(game.current_turn().await, Some(p1));
}

#[tokio::test]
async fn rotation_skips_passed_players() {
    let game = started_game(3).await;
    let (p0, p2) = (game.players[0].clone(), game.players[2].clone());
    let turns = TurnFlowService::new();

    // p0 passes, p1 passes; rotation from p1 must land on p2.
    turns
        .skip_action(&game.state, &game.ctx, &game.game_id, &p0)
        .await
        .unwrap();
    turns
        .skip_action(&game.state, &game.ctx, &game.game_id, &game.players[1])
        .await
        .unwrap();

    assert_eq!(game.current_turn().await, Some(p2));
}

#[tokio::test]
async fn last_pass_advances_the_generation() {
    let game = started_game(2).await;
    let (p0, p1) = (game.players[0].clone(), game.players[1].clone());
    let turns = TurnFlowService::new();
    let budget = game.state.config().actions_per_turn;

    // Consume something so the reset is observable.
    game.session().turn(&p0).unwrap().consume_action().unwrap();
    game.session().turn(&p0).unwrap().consume_action().unwrap();
    turns
        .skip_action(&game.state, &game.ctx, &game.game_id, &p0)
        .await
        .unwrap();
    // p0 only ended their turn; p1 passes, then p0 (fresh budget) passes.
    turns
        .skip_action(&game.state, &game.ctx, &game.game_id, &p1)
        .await
        .unwrap();
    turns
        .skip_action(&game.state, &game.ctx, &game.game_id, &p0)
        .await
        .unwrap();

    assert_eq!(game.generation().await, 2);
    assert_eq!(game.current_turn().await, Some(p0.clone()));
    // Everyone is unpassed again with a full budget.
    for player in &game.players {
        assert!(!game.session().turn(player).unwrap().has_passed());
        assert_eq!(game.budget(player), budget);
    }
}

#[tokio::test]
async fn skip_out_of_turn_is_rejected() {
    let game = started_game(2).await;
    let p1 = game.players[1].clone();

    let err = TurnFlowService::new()
        .skip_action(&game.state, &game.ctx, &game.game_id, &p1)
        .await
        .unwrap_err();

    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::NotPlayersTurn {
            current: Some(game.players[0].clone())
        })
    );
}
