// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry an async operation with randomized exponential backoff.
//!
//! Every failure is retried the same way. There is no error classification and
//! no shared retry budget; callers must only pass idempotent operations.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Attempt count and backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero behaves as one.
    pub retries: u32,
    /// Base delay, doubled per attempt.
    pub min_timeout: Duration,
    /// Upper bound for the random component of the delay.
    pub max_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            min_timeout: Duration::from_millis(1000),
            max_timeout: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, min_timeout: Duration, max_timeout: Duration) -> Self {
        Self {
            retries,
            min_timeout,
            max_timeout,
        }
    }

    /// A policy that never sleeps. Handy for tests that count attempts.
    pub fn immediate(retries: u32) -> Self {
        Self::new(retries, Duration::ZERO, Duration::ZERO)
    }
}

/// Delay slept after the 1-based `attempt` failed, given a `random` in `[0, 1)`.
///
/// `min(random * max_timeout, min_timeout * 2^attempt)`
pub fn retry_delay(policy: &RetryPolicy, attempt: u32, random: f64) -> Duration {
    let jittered = policy.max_timeout.mul_f64(random.clamp(0.0, 1.0));
    let exponential = policy
        .min_timeout
        .checked_mul(2u32.saturating_pow(attempt))
        .unwrap_or(Duration::MAX);
    jittered.min(exponential)
}

/// Run `op` up to `policy.retries` times, returning the first success or the
/// last error unchanged.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.retries.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                let delay = retry_delay(policy, attempt, rand::thread_rng().r#gen::<f64>());
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
