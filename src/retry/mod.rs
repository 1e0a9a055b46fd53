//! Retry policy with exponential backoff and jitter
//!
//! Wraps an arbitrary asynchronous operation and re-invokes it when the
//! failure is classified as transient: connectivity errors, deadline
//! expiries, and a configurable set of HTTP statuses. Non-transient
//! failures (401, 422, 404, ...) propagate immediately.
//!
//! The policy is always constructor-injected by its users; there is no
//! process-wide default instance, so tests can substitute a zero-delay
//! policy.

use crate::error::{Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy configuration and executor
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`
    max_retries: u32,
    /// Delay before the first retry
    base_delay: Duration,
    /// Upper bound on any single backoff delay
    max_delay: Duration,
    /// HTTP statuses considered transient
    retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30000),
            retryable_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy builder
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that never retries; useful for non-idempotent calls
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Execute `operation`, retrying transient failures with backoff
    ///
    /// Invokes `operation` at most `max_retries + 1` times. When all
    /// attempts are exhausted the error from the *last* attempt is
    /// propagated unchanged, so callers can still branch on its
    /// classification (e.g. a rate limit's retry-after hint).
    pub async fn execute<T, F, Fut>(&self, context: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_retries || !self.is_retryable(&error) {
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        context,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Whether a failure is worth another attempt
    pub fn is_retryable(&self, error: &Error) -> bool {
        if error.is_connect_error() || error.is_timeout() {
            return true;
        }
        error
            .status()
            .is_some_and(|status| self.retryable_statuses.contains(&status))
    }

    /// Backoff delay for a given attempt index
    ///
    /// `min(base * 2^attempt * (1 + jitter), max_delay)` with jitter drawn
    /// uniformly from [0, 0.1).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.unjittered_delay_ms(attempt);
        let jitter = rand::thread_rng().gen_range(0.0..0.1);
        let jittered = (exponential as f64 * (1.0 + jitter)) as u64;
        Duration::from_millis(jittered.min(self.max_delay.as_millis() as u64))
    }

    /// Exponential delay in milliseconds before jitter and capping
    pub fn unjittered_delay_ms(&self, attempt: u32) -> u64 {
        let base = self.base_delay.as_millis() as u64;
        base.saturating_mul(2u64.saturating_pow(attempt))
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.policy.max_retries = retries;
        self
    }

    /// Set the delay before the first retry
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.policy.base_delay = delay;
        self
    }

    /// Set the upper bound on any single delay
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.policy.max_delay = delay;
        self
    }

    /// Replace the set of HTTP statuses considered transient
    pub fn retryable_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.policy.retryable_statuses = statuses.into();
        self
    }

    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}
