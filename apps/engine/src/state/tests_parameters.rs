use crate::events::GameEvent;
use crate::state::parameters::{
    GlobalParameters, Parameters, MAX_OCEANS, MAX_OXYGEN, MAX_TEMPERATURE,
};

fn params_at(temperature: i32, oxygen: i32, oceans: i32) -> GlobalParameters {
    GlobalParameters::with_values(
        "g1".into(),
        Parameters {
            temperature,
            oxygen,
            oceans,
        },
    )
}

#[test]
fn oxygen_clamps_and_reports_actual_delta() {
    let params = params_at(-30, 12, 0);
    let (actual, events) = params.raise_oxygen(5);

    assert_eq!(actual, 2);
    assert_eq!(params.snapshot().oxygen, MAX_OXYGEN);
    assert_eq!(events.len(), 1);
    match &events[0] {
        GameEvent::OxygenChanged { old, new, .. } => {
            assert_eq!((*old, *new), (12, 14));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn raise_at_ceiling_is_silent_no_op() {
    let params = params_at(MAX_TEMPERATURE, MAX_OXYGEN, 0);
    let (actual, events) = params.raise_temperature(3);
    assert_eq!(actual, 0);
    assert!(events.is_empty());
}

#[test]
fn temperature_moves_two_degrees_per_step() {
    let params = params_at(-30, 0, 0);
    let (actual, _) = params.raise_temperature(2);
    assert_eq!(actual, 2);
    assert_eq!(params.snapshot().temperature, -26);
}

#[test]
fn negative_steps_lower_and_clamp_at_floor() {
    let params = params_at(-28, 1, 0);
    let (actual, _) = params.raise_temperature(-5);
    assert_eq!(actual, -1);
    assert_eq!(params.snapshot().temperature, -30);

    let (actual, events) = params.raise_oxygen(-3);
    assert_eq!(actual, -1);
    assert_eq!(params.snapshot().oxygen, 0);
    assert_eq!(events.len(), 1);
}

#[test]
fn ocean_placement_stops_at_maximum() {
    let params = params_at(-30, 0, MAX_OCEANS - 1);
    let (placed, events) = params.place_ocean();
    assert!(placed);
    assert_eq!(events.len(), 1);

    let (placed, events) = params.place_ocean();
    assert!(!placed);
    assert!(events.is_empty());
    assert_eq!(params.snapshot().oceans, MAX_OCEANS);
}

#[test]
fn remove_ocean_reverses_placement() {
    let params = params_at(-30, 0, 3);
    params.place_ocean();
    let (removed, _) = params.remove_ocean();
    assert!(removed);
    assert_eq!(params.snapshot().oceans, 3);
}

#[test]
fn is_maxed_requires_all_three() {
    assert!(!params_at(MAX_TEMPERATURE, MAX_OXYGEN, 0).is_maxed());
    assert!(params_at(MAX_TEMPERATURE, MAX_OXYGEN, MAX_OCEANS).is_maxed());
}
