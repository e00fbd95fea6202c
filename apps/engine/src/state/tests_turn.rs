use crate::errors::validation::ValidationError;
use crate::state::turn::TurnState;

fn turn(budget: i32) -> TurnState {
    TurnState::new("g1".into(), "p1".into(), budget)
}

#[test]
fn consume_decrements_until_floor() {
    let state = turn(2);
    assert!(state.consume_action().is_ok());
    assert!(state.consume_action().is_ok());
    assert_eq!(state.remaining(), 0);
    assert_eq!(
        state.consume_action().unwrap_err(),
        ValidationError::NoActionsRemaining
    );
    // Failed consume leaves the budget at the floor, not below.
    assert_eq!(state.remaining(), 0);
}

#[test]
fn restore_action_undoes_consume() {
    let state = turn(2);
    state.consume_action().unwrap();
    state.restore_action();
    assert_eq!(state.remaining(), 2);
}

#[test]
fn activation_gate_is_once_per_generation() {
    let state = turn(2);
    assert!(state.note_activation("heat-vents").is_ok());
    assert_eq!(
        state.note_activation("heat-vents").unwrap_err(),
        ValidationError::EffectAlreadyActivated {
            effect_id: "heat-vents".into()
        }
    );

    state.reset_generation(2);
    assert!(state.note_activation("heat-vents").is_ok());
}

#[test]
fn clear_activation_reopens_the_gate() {
    let state = turn(2);
    state.note_activation("heat-vents").unwrap();
    state.clear_activation("heat-vents");
    assert!(state.note_activation("heat-vents").is_ok());
}

#[test]
fn reset_generation_clears_passed_and_refills() {
    let state = turn(1);
    state.consume_action().unwrap();
    state.set_passed(true);
    assert!(state.has_passed());

    state.reset_generation(2);
    assert!(!state.has_passed());
    assert_eq!(state.remaining(), 2);
}

#[test]
fn snapshot_restore_round_trips() {
    let state = turn(2);
    let before = state.snapshot();

    state.consume_action().unwrap();
    state.set_passed(true);
    state.note_activation("heat-vents").unwrap();

    state.restore(before.clone());
    assert_eq!(state.snapshot(), before);
}
