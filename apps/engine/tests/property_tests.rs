//! Property tests for clamping, ledger arithmetic, and transaction
//! atomicity.

mod support;

use proptest::prelude::*;

use engine::prelude::*;
use engine::state::{GlobalParameters, Parameters, ResourceLedger};
use engine::txn::ops;

fn parameters_at(oxygen: i32) -> GlobalParameters {
    GlobalParameters::with_values(
        "prop-game".into(),
        Parameters {
            temperature: -30,
            oxygen,
            oceans: 0,
        },
    )
}

proptest! {
    /// Raising oxygen from any level by any amount lands exactly on
    /// `min(ceiling, level + steps)` and reports the actual delta.
    #[test]
    fn oxygen_clamps_to_ceiling(start in 0..=14, steps in 0..40) {
        let params = parameters_at(start);
        let (actual, events) = params.raise_oxygen(steps);

        let expected = (start + steps).min(14);
        prop_assert_eq!(params.snapshot().oxygen, expected);
        prop_assert_eq!(actual, expected - start);
        if expected == start {
            prop_assert!(events.is_empty());
        } else {
            prop_assert_eq!(events.len(), 1);
            match &events[0] {
                GameEvent::OxygenChanged { old, new, .. } => {
                    prop_assert_eq!(*old, start);
                    prop_assert_eq!(*new, expected);
                }
                other => prop_assert!(false, "unexpected event {:?}", other),
            }
        }
    }

    /// A debit either fully applies or fully fails; crediting the same
    /// amount back restores the starting vector exactly.
    #[test]
    fn debit_is_atomic_and_credit_inverts_it(
        credits in 0i32..100,
        steel in 0i32..100,
        cost_credits in 0i32..100,
        cost_steel in 0i32..100,
    ) {
        let starting = Resources { credits, steel, ..Resources::default() };
        let cost = Resources { credits: cost_credits, steel: cost_steel, ..Resources::default() };
        let ledger = ResourceLedger::new("prop-game".into(), "p".into(), starting);

        match ledger.debit(&cost) {
            Ok(_) => {
                prop_assert!(credits >= cost_credits && steel >= cost_steel);
                ledger.credit(&cost);
                prop_assert_eq!(ledger.snapshot(), starting);
            }
            Err(_) => {
                prop_assert!(credits < cost_credits || steel < cost_steel);
                prop_assert_eq!(ledger.snapshot(), starting);
            }
        }
    }

    /// The first-shortfall report always names a genuinely uncovered
    /// dimension with the true amounts.
    #[test]
    fn shortfall_report_is_accurate(
        held_credits in 0i32..50,
        held_heat in 0i32..50,
        cost_credits in 0i32..50,
        cost_heat in 0i32..50,
    ) {
        let held = Resources { credits: held_credits, heat: held_heat, ..Resources::default() };
        let cost = Resources { credits: cost_credits, heat: cost_heat, ..Resources::default() };

        match held.first_shortfall(&cost) {
            None => {
                prop_assert!(held_credits >= cost_credits && held_heat >= cost_heat);
            }
            Some((kind, required, available)) => {
                prop_assert_eq!(required, cost.get(kind));
                prop_assert_eq!(available, held.get(kind));
                prop_assert!(available < required);
            }
        }
    }

    /// For any prefix length k, failing the transaction at operation k+1
    /// leaves the ledger exactly where it started.
    #[test]
    fn forced_failure_restores_ledger(deltas in proptest::collection::vec(1i32..20, 1..6)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let game = support::started_game(2).await;
            let session = game.session();
            let player = game.players[0].clone();
            let before = game.resources(&player);

            let result = session
                .manager()
                .execute_atomic(&game.ctx, |txn| {
                    for delta in &deltas {
                        ops::credit_resources(txn, &session, &player, Resources::credits(*delta))?;
                    }
                    txn.push(Operation::new(
                        "poisoned tail",
                        || async { Err(EngineError::repo("forced failure")) },
                        || async { Ok(()) },
                    ));
                    Ok(())
                })
                .await;

            assert!(result.is_err());
            assert_eq!(game.resources(&player), before);
        });
    }
}
