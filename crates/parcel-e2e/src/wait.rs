// Wait - generic condition polling with fixed-interval retry
//
// The backend is eventually consistent: shipments, statuses, and return
// requests appear some time after the write that created them. Every
// "wait for X" operation in the suite funnels through the poll loop here,
// parameterized by a value producer (one backend read) and a termination
// predicate.
//
// Two budget-exhaustion policies coexist and callers rely on the
// distinction: strict waits raise a descriptive timeout error, lenient
// waits return `false` and let the test decide.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Outer attempt count for the waits that restart their whole budget when
/// it runs out ("shipment available", "return request submitted"). The
/// worst case wall time compounds to `OUTER_ATTEMPTS * timeout`.
pub const OUTER_ATTEMPTS: u32 = 3;

/// Interval, timeout, and optional attempt ceiling for one poll operation.
///
/// The interval is fixed between attempts (no backoff). A zero timeout
/// means "check once, no retry".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    interval: Duration,
    timeout: Duration,
    max_attempts: Option<u32>,
}

impl WaitSpec {
    /// Creates a spec, rejecting a zero interval.
    pub fn new(interval: Duration, timeout: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidArgument(
                "poll interval must be greater than zero".into(),
            ));
        }
        Ok(Self {
            interval,
            timeout,
            max_attempts: None,
        })
    }

    /// Known-good preset construction; see the `policy` module.
    pub(crate) const fn preset(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            max_attempts: None,
        }
    }

    /// Caps the number of attempts in addition to the time budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Replaces the time budget, keeping interval and attempt ceiling.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Timeout in seconds, the unit used by wait diagnostics.
    pub fn timeout_secs(&self) -> f64 {
        self.timeout.as_secs_f64()
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult<T> {
    /// The predicate held for `value` after `attempts` evaluations.
    Satisfied {
        value: T,
        attempts: u32,
        elapsed: Duration,
    },
    /// The budget ran out; `last` is the most recent successfully
    /// produced value, if any attempt produced one.
    TimedOut {
        last: Option<T>,
        attempts: u32,
        elapsed: Duration,
    },
}

impl<T> PollResult<T> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollResult::Satisfied { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollResult::Satisfied { attempts, .. } | PollResult::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollResult::Satisfied { elapsed, .. } | PollResult::TimedOut { elapsed, .. } => {
                *elapsed
            }
        }
    }

    /// Most recent observed value, for timeout diagnostics.
    pub fn last_value(&self) -> Option<&T> {
        match self {
            PollResult::Satisfied { value, .. } => Some(value),
            PollResult::TimedOut { last, .. } => last.as_ref(),
        }
    }
}

fn out_of_attempts(spec: &WaitSpec, attempts: u32) -> bool {
    spec.max_attempts().is_some_and(|max| attempts >= max)
}

/// Repeatedly invokes `producer` until `predicate` accepts the produced
/// value or the budget runs out.
///
/// Producer errors are logged and treated as "not yet satisfied"; the
/// backend routinely serves errors inside its consistency window and a
/// wait that gave up on the first 502 would be useless. The elapsed budget
/// is accumulated in interval increments and checked after each failed
/// evaluation, so a zero timeout performs exactly one evaluation and a
/// first-attempt success never sleeps.
///
/// Cancelling `cancel` resolves the wait promptly with
/// [`Error::WaitCancelled`], including mid-sleep.
pub async fn poll<T, P, Fut, C>(
    spec: &WaitSpec,
    cancel: &CancellationToken,
    mut producer: P,
    predicate: C,
) -> Result<PollResult<T>>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut budget_used = Duration::ZERO;
    let mut attempts: u32 = 0;
    let mut last: Option<T> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::WaitCancelled);
        }

        attempts += 1;
        match producer().await {
            Ok(value) => {
                if predicate(&value) {
                    return Ok(PollResult::Satisfied {
                        value,
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }
                last = Some(value);
            }
            Err(error) => {
                tracing::warn!("poll attempt {attempts} failed: {error}");
            }
        }

        if budget_used >= spec.timeout() || out_of_attempts(spec, attempts) {
            return Ok(PollResult::TimedOut {
                last,
                attempts,
                elapsed: started.elapsed(),
            });
        }

        tracing::debug!("attempt {attempts}: condition not yet satisfied, retrying");
        tokio::select! {
            _ = cancel.cancelled() => return Err(Error::WaitCancelled),
            _ = tokio::time::sleep(spec.interval()) => {}
        }
        budget_used += spec.interval();
    }
}

/// Strict variant: budget exhaustion becomes [`Error::WaitTimeout`] with a
/// message built by `describe` from the final outcome.
pub async fn poll_strict<T, P, Fut, C, D>(
    spec: &WaitSpec,
    cancel: &CancellationToken,
    producer: P,
    predicate: C,
    describe: D,
) -> Result<T>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&T) -> bool,
    D: FnOnce(&PollResult<T>) -> String,
{
    match poll(spec, cancel, producer, predicate).await? {
        PollResult::Satisfied { value, .. } => Ok(value),
        timed_out => Err(Error::WaitTimeout(describe(&timed_out))),
    }
}

/// Lenient variant: budget exhaustion yields `Ok(false)`, never an error
/// (cancellation excepted).
pub async fn poll_lenient<T, P, Fut, C>(
    spec: &WaitSpec,
    cancel: &CancellationToken,
    producer: P,
    predicate: C,
) -> Result<bool>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&T) -> bool,
{
    Ok(poll(spec, cancel, producer, predicate)
        .await?
        .is_satisfied())
}

/// Strict poll that restarts its entire budget up to `outer_attempts`
/// times before failing.
///
/// This reproduces the historical behavior of the shipment-available and
/// return-request waits: total worst-case wall time is
/// `outer_attempts * timeout`, and downstream timing-sensitive tests
/// depend on that larger effective window. Do not flatten it into a
/// single budget.
pub async fn poll_with_reattempts<T, P, Fut, C, D>(
    outer_attempts: u32,
    spec: &WaitSpec,
    cancel: &CancellationToken,
    mut producer: P,
    predicate: C,
    describe: D,
) -> Result<T>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&T) -> bool,
    D: FnOnce(&PollResult<T>) -> String,
{
    if outer_attempts == 0 {
        return Err(Error::InvalidArgument(
            "at least one outer poll attempt is required".into(),
        ));
    }

    let mut outcome = poll(spec, cancel, &mut producer, &predicate).await?;
    let mut attempt = 1;
    while !outcome.is_satisfied() && attempt < outer_attempts {
        tracing::debug!("poll budget exhausted, restarting <attempt: {attempt}>");
        outcome = poll(spec, cancel, &mut producer, &predicate).await?;
        attempt += 1;
    }

    match outcome {
        PollResult::Satisfied {
            value,
            attempts,
            elapsed,
        } => {
            tracing::debug!("condition satisfied after {attempts} attempts in {elapsed:?}");
            Ok(value)
        }
        timed_out => Err(Error::WaitTimeout(describe(&timed_out))),
    }
}
