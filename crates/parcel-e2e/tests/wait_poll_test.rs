// Integration tests for the predicate poller
//
// These run against in-memory producers with the tokio clock paused, so
// every timing assertion is exact: sleeps advance virtual time and the
// recorded elapsed durations are deterministic.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use parcel_e2e::wait::{self, CancellationToken, PollResult, WaitSpec};
use parcel_e2e::Error;

fn spec(interval_ms: u64, timeout_ms: u64) -> WaitSpec {
    WaitSpec::new(
        Duration::from_millis(interval_ms),
        Duration::from_millis(timeout_ms),
    )
    .expect("valid spec")
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_checks_exactly_once() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let outcome = wait::poll(
        &spec(50, 0),
        &cancel,
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u64, Error>(0) }
        },
        |count| *count > 0,
    )
    .await
    .expect("poll should complete");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(outcome, PollResult::TimedOut { attempts: 1, .. }));
    // No sleep happened: virtual time did not move.
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success_never_sleeps() {
    common::init_tracing();
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let outcome = wait::poll(
        &spec(50, 1_000),
        &cancel,
        || async move { Ok::<u64, Error>(3) },
        |count| *count > 0,
    )
    .await
    .expect("poll should complete");

    match outcome {
        PollResult::Satisfied {
            value, attempts, ..
        } => {
            assert_eq!(value, 3);
            assert_eq!(attempts, 1);
        }
        other => panic!("expected satisfied, got {other:?}"),
    }
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_condition_satisfied_on_third_attempt() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();

    // count sequence: 0, 0, 1 - mirrors a shipment appearing after two
    // consistency-window misses.
    let outcome = wait::poll(
        &spec(50, 150),
        &cancel,
        || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u64, Error>(if call >= 2 { 1 } else { 0 }) }
        },
        |count| *count > 0,
    )
    .await
    .expect("poll should complete");

    match outcome {
        PollResult::Satisfied {
            attempts, elapsed, ..
        } => {
            assert_eq!(attempts, 3);
            // Two sleeps of the 50ms interval.
            assert_eq!(elapsed, Duration::from_millis(100));
        }
        other => panic!("expected satisfied, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_strict_timeout_carries_diagnostics() {
    common::init_tracing();
    let cancel = CancellationToken::new();
    let spec = spec(50, 100);

    let result = wait::poll_strict(
        &spec,
        &cancel,
        || async move { Ok::<String, Error>("pending".to_string()) },
        |status| status == "delivered",
        |outcome| {
            format!(
                "status wait gave up\n- Expected: delivered\n- Actual: {}\n- Timeout: {} (seconds)",
                outcome.last_value().map_or("<none>", String::as_str),
                spec.timeout_secs()
            )
        },
    )
    .await;

    let error = result.expect_err("wait should time out");
    let message = error.to_string();
    assert!(message.contains("pending"), "missing actual: {message}");
    assert!(message.contains("delivered"), "missing expected: {message}");
    assert!(message.contains("0.1 (seconds)"), "missing timeout: {message}");
}

#[tokio::test(start_paused = true)]
async fn test_lenient_timeout_returns_false() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();

    let satisfied = wait::poll_lenient(
        &spec(40, 100),
        &cancel,
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<bool, Error>(false) }
        },
        |found| *found,
    )
    .await
    .expect("lenient wait should not error");

    assert!(!satisfied);
    assert!(calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_producer_errors_are_tolerated() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();

    // Two transient failures, then the backend catches up.
    let outcome = wait::poll(
        &spec(50, 1_000),
        &cancel,
        || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(Error::UnexpectedStatus {
                        status: 502,
                        url: "http://backend/search".into(),
                    })
                } else {
                    Ok(5u64)
                }
            }
        },
        |count| *count > 0,
    )
    .await
    .expect("poll should complete");

    assert!(matches!(outcome, PollResult::Satisfied { attempts: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_outer_reattempts_compound_the_budget() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();
    let spec = spec(50, 100);

    let started = tokio::time::Instant::now();
    let result = wait::poll_with_reattempts(
        wait::OUTER_ATTEMPTS,
        &spec,
        &cancel,
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u64, Error>(0) }
        },
        |count| *count > 0,
        |_| "FAILED TO WAIT FOR SHIPMENT TO BE DISPLAYED".to_string(),
    )
    .await;

    assert!(matches!(result, Err(Error::WaitTimeout(_))));
    // Each inner window: attempts at 0ms, 50ms, 100ms of budget, i.e. two
    // sleeps. Three windows compound to 3 x 100ms of sleeping.
    assert_eq!(started.elapsed(), Duration::from_millis(300));
    assert_eq!(calls.load(Ordering::SeqCst), 9);
}

#[tokio::test(start_paused = true)]
async fn test_max_attempts_caps_the_loop() {
    common::init_tracing();
    let calls = AtomicU32::new(0);
    let cancel = CancellationToken::new();
    let spec = spec(50, 3_600_000).with_max_attempts(4);

    let outcome = wait::poll(
        &spec,
        &cancel,
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u64, Error>(0) }
        },
        |count| *count > 0,
    )
    .await
    .expect("poll should complete");

    assert!(matches!(outcome, PollResult::TimedOut { attempts: 4, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_resolves_wait_promptly() {
    common::init_tracing();
    let cancel = CancellationToken::new();
    let poll_cancel = cancel.clone();

    let handle = tokio::spawn(async move {
        wait::poll(
            &WaitSpec::new(Duration::from_secs(5), Duration::from_secs(3600)).unwrap(),
            &poll_cancel,
            || async move { Ok::<u64, Error>(0) },
            |count| *count > 0,
        )
        .await
    });

    // Let the poll enter its inter-attempt sleep, then abort it.
    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    let result = handle.await.expect("task should not panic");
    assert!(matches!(result, Err(Error::WaitCancelled)));
}

#[tokio::test(start_paused = true)]
async fn test_zero_outer_attempts_rejected() {
    common::init_tracing();
    let cancel = CancellationToken::new();

    let result = wait::poll_with_reattempts(
        0,
        &spec(50, 100),
        &cancel,
        || async move { Ok::<u64, Error>(1) },
        |count| *count > 0,
        |_| String::new(),
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}
