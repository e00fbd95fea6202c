use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::events::bus::EventBus;
use crate::events::GameEvent;
use crate::txn::manager::TransactionManager;
use crate::txn::operation::Operation;

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn manager() -> TransactionManager {
    TransactionManager::new("g1".into(), Arc::new(EventBus::new()), 16)
}

fn traced_op(trace: &Trace, fwd: &'static str, rev: &'static str) -> Operation {
    let fwd_trace = Arc::clone(trace);
    let rev_trace = Arc::clone(trace);
    Operation::new(
        fwd,
        move || async move {
            fwd_trace.lock().push(fwd);
            Ok(())
        },
        move || async move {
            rev_trace.lock().push(rev);
            Ok(())
        },
    )
}

fn failing_op(name: &'static str) -> Operation {
    Operation::new(
        name,
        move || async move { Err(EngineError::repo("write refused")) },
        || async { Ok(()) },
    )
}

#[tokio::test]
async fn operations_run_in_append_order() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(traced_op(&trace, "op1", "undo1"));
            txn.push(traced_op(&trace, "op2", "undo2"));
            txn.push(traced_op(&trace, "op3", "undo3"));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(*trace.lock(), vec!["op1", "op2", "op3"]);
}

#[tokio::test]
async fn failure_rolls_back_prefix_in_reverse_order() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(traced_op(&trace, "op1", "undo1"));
            txn.push(traced_op(&trace, "op2", "undo2"));
            txn.push(failing_op("op3"));
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(*trace.lock(), vec!["op1", "op2", "undo2", "undo1"]);
    match err {
        EngineError::Operation { name, source } => {
            assert_eq!(name, "op3");
            assert!(matches!(*source, EngineError::Repo { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rollback_failure_does_not_mask_original_error() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();
    let rev_trace = Arc::clone(&trace);

    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(Operation::new(
                "op1",
                || async { Ok(()) },
                move || async move {
                    rev_trace.lock().push("undo1-failed");
                    Err(EngineError::repo("undo refused"))
                },
            ));
            txn.push(failing_op("op2"));
            Ok(())
        })
        .await
        .unwrap_err();

    // The rollback ran and failed, yet op2's error is what surfaces.
    assert_eq!(*trace.lock(), vec!["undo1-failed"]);
    assert!(matches!(err, EngineError::Operation { ref name, .. } if name == "op2"));
}

#[tokio::test]
async fn empty_transaction_is_noop_success() {
    let ctx = CancellationToken::new();
    manager().execute_atomic(&ctx, |_txn| Ok(())).await.unwrap();
}

#[tokio::test]
async fn build_error_abandons_without_executing() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(traced_op(&trace, "op1", "undo1"));
            Err(EngineError::unknown_effect("no-such-card"))
        })
        .await
        .unwrap_err();

    assert!(trace.lock().is_empty());
    assert!(matches!(err, EngineError::UnknownEffect(_)));
}

#[tokio::test]
async fn cancelled_before_start_runs_nothing() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();
    ctx.cancel();

    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(traced_op(&trace, "op1", "undo1"));
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Cancelled));
    assert!(trace.lock().is_empty());
}

#[tokio::test]
async fn cancelled_mid_flight_rolls_back_applied_prefix() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    let cancel = ctx.clone();
    let fwd_trace = Arc::clone(&trace);
    let rev_trace = Arc::clone(&trace);
    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(Operation::new(
                "op1",
                move || async move {
                    fwd_trace.lock().push("op1");
                    cancel.cancel();
                    Ok(())
                },
                move || async move {
                    rev_trace.lock().push("undo1");
                    Ok(())
                },
            ));
            txn.push(traced_op(&trace, "op2", "undo2"));
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Cancelled));
    assert_eq!(*trace.lock(), vec!["op1", "undo1"]);
}

#[tokio::test]
async fn irreversible_operation_must_be_last() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    let fwd_trace = Arc::clone(&trace);
    let err = manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(Operation::irreversible("op1", move || async move {
                fwd_trace.lock().push("op1");
                Ok(())
            }));
            txn.push(traced_op(&trace, "op2", "undo2"));
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::IrreversibleNotLast { ref name } if name == "op1"));
    assert!(trace.lock().is_empty());
}

#[tokio::test]
async fn irreversible_operation_in_final_slot_is_accepted() {
    let trace: Trace = Arc::default();
    let ctx = CancellationToken::new();

    let fwd_trace = Arc::clone(&trace);
    manager()
        .execute_atomic(&ctx, |txn| {
            txn.push(traced_op(&trace, "op1", "undo1"));
            txn.push(Operation::irreversible("op2", move || async move {
                fwd_trace.lock().push("op2");
                Ok(())
            }));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(*trace.lock(), vec!["op1", "op2"]);
}

#[tokio::test]
async fn committed_events_publish_with_trailing_broadcast() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    {
        let seen = Arc::clone(&seen);
        bus.subscribe(move |event| {
            seen.lock().push(event.kind().to_string());
            Ok(())
        });
    }

    let manager = TransactionManager::new("g1".into(), Arc::clone(&bus), 16);
    let ctx = CancellationToken::new();

    manager
        .execute_atomic(&ctx, |txn| {
            let events = txn.events();
            txn.push(Operation::new(
                "raise oxygen",
                move || async move {
                    events.record_one(GameEvent::OxygenChanged {
                        game_id: "g1".into(),
                        old: 0,
                        new: 1,
                    });
                    Ok(())
                },
                || async { Ok(()) },
            ));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(
        *seen.lock(),
        vec!["oxygen_changed".to_string(), "broadcast_requested".to_string()]
    );
}

#[tokio::test]
async fn failed_transaction_publishes_nothing() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    {
        let seen = Arc::clone(&seen);
        bus.subscribe(move |event| {
            seen.lock().push(event.kind().to_string());
            Ok(())
        });
    }

    let manager = TransactionManager::new("g1".into(), Arc::clone(&bus), 16);
    let ctx = CancellationToken::new();

    let result = manager
        .execute_atomic(&ctx, |txn| {
            let events = txn.events();
            txn.push(Operation::new(
                "raise oxygen",
                move || async move {
                    events.record_one(GameEvent::OxygenChanged {
                        game_id: "g1".into(),
                        old: 0,
                        new: 1,
                    });
                    Ok(())
                },
                || async { Ok(()) },
            ));
            txn.push(failing_op("write state"));
            Ok(())
        })
        .await;

    assert!(result.is_err());
    assert!(seen.lock().is_empty());
}
