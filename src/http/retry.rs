//! Retry decisions and backoff
//!
//! [`decide`] is a pure function over a classified [`Error`]; the client
//! combines it with a [`RetryPolicy`] and an injected [`Sleeper`] so that
//! tests can observe the backoff schedule without waiting on a real clock.

use crate::error::{Error, ErrorKind};
use async_trait::async_trait;
use std::time::Duration;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up and return the error
    NoRetry,
    /// Retry after the policy's backoff delay
    Retry,
    /// Retry after a server-specified delay in milliseconds
    RetryAfter(u64),
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        !matches!(self, Self::NoRetry)
    }
}

/// Decide whether a failed attempt is worth repeating
pub fn decide(error: &Error) -> RetryDecision {
    match error.status() {
        Some(408 | 409) => RetryDecision::Retry,
        Some(429) => match error.retry_after_ms() {
            Some(ms) => RetryDecision::RetryAfter(ms),
            None => RetryDecision::Retry,
        },
        Some(status) if status >= 500 => RetryDecision::Retry,
        Some(_) => RetryDecision::NoRetry,
        None if error.is_unexpected() => RetryDecision::NoRetry,
        None => match error.kind() {
            ErrorKind::Timeout | ErrorKind::Connection => RetryDecision::Retry,
            _ => RetryDecision::NoRetry,
        },
    }
}

/// Retry budget and backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap on computed delays; server hints are not capped
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff for a 0-based retry attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self.initial_backoff.saturating_mul(factor);
        std::cmp::min(delay, self.max_backoff)
    }

    /// Delay before the next attempt, or `None` to stop
    ///
    /// `attempt` is the 0-based index of the attempt that just failed.
    pub fn next_delay(&self, decision: RetryDecision, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        match decision {
            RetryDecision::NoRetry => None,
            RetryDecision::Retry => Some(self.backoff(attempt)),
            RetryDecision::RetryAfter(ms) => Some(Duration::from_millis(ms)),
        }
    }
}

/// Suspends the retrying call between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
