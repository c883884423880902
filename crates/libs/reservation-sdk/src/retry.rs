use crate::error::TransportError;
use crate::operation::Operation;
use crate::policy::RetryPolicy;
use serde_json::json;
use std::time::{Duration, Instant};

/// Endless exponential schedule of sleeps between attempts, capped at the
/// policy's `max_backoff`.
#[derive(Clone, Debug)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    multiplier: f64,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        let multiplier = if policy.multiplier.is_finite() && policy.multiplier >= 1.0 {
            policy.multiplier
        } else {
            1.0
        };
        Self {
            next: policy.initial_backoff.min(policy.max_backoff),
            max: policy.max_backoff,
            multiplier,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        let grown = (current.as_secs_f64() * self.multiplier).min(self.max.as_secs_f64());
        self.next = Duration::from_secs_f64(grown);
        Some(current)
    }
}

fn retry_delay(
    operation: Operation,
    policy: &RetryPolicy,
    err: TransportError,
    elapsed: Duration,
    backoff: &mut Backoff,
    attempts: u32,
) -> Result<Duration, TransportError> {
    if !policy.is_retryable(err.kind) {
        return Err(err);
    }
    let remaining = policy.deadline.saturating_sub(elapsed);
    if remaining.is_zero() {
        log::warn!(
            "{operation} retry deadline {:?} exhausted after {attempts} attempts: {err}",
            policy.deadline
        );
        return Err(err.with_detail("attempts", json!(attempts)));
    }
    let delay = backoff.next().unwrap_or(policy.max_backoff).min(remaining);
    log::debug!("{operation} attempt {attempts} failed with {}, retrying in {delay:?}", err.kind);
    Ok(delay)
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or the
/// policy deadline passes. Attempts themselves are never preempted.
pub fn run_blocking<T, F>(
    operation: Operation,
    retry: Option<&RetryPolicy>,
    mut attempt: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Result<T, TransportError>,
{
    let Some(policy) = retry else {
        return attempt();
    };
    let started = Instant::now();
    let mut backoff = Backoff::new(policy);
    let mut attempts = 0_u32;
    loop {
        attempts += 1;
        let err = match attempt() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let delay = retry_delay(operation, policy, err, started.elapsed(), &mut backoff, attempts)?;
        std::thread::sleep(delay);
    }
}

/// Async variant of [`run_blocking`]. Each attempt is bounded by `timeout`
/// and by whatever remains of the retry deadline; an attempt that runs out of
/// time fails with `DeadlineExceeded`.
#[cfg(feature = "sdk-async")]
pub async fn run_async<T, F, Fut>(
    operation: Operation,
    timeout: Duration,
    retry: Option<&RetryPolicy>,
    mut attempt: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, TransportError>>,
{
    let started = tokio::time::Instant::now();
    let mut backoff = retry.map(Backoff::new);
    let mut attempts = 0_u32;
    loop {
        attempts += 1;
        let budget = match retry {
            Some(policy) => timeout.min(policy.deadline.saturating_sub(started.elapsed())),
            None => timeout,
        };
        let err = match tokio::time::timeout(budget, attempt()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => err,
            Err(_) => TransportError::deadline_exceeded(format!(
                "{operation} did not complete within {budget:?}"
            ))
            .with_detail("operation", json!(operation.as_str()))
            .with_detail("timeout_ms", json!(budget.as_millis() as u64)),
        };
        let (Some(policy), Some(backoff)) = (retry, backoff.as_mut()) else {
            return Err(err);
        };
        let delay = retry_delay(operation, policy, err, started.elapsed(), backoff, attempts)?;
        tokio::time::sleep(delay).await;
    }
}
