//! Bounded exponential backoff for cache client calls.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// First retry delay.
pub const BACKOFF_BASE: Duration = Duration::from_millis(50);
/// Upper bound on any single retry delay.
pub const BACKOFF_CAP: Duration = Duration::from_secs(2);
/// Retries attempted after the first failure unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Retry schedule for a single cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base: Duration,
    cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    /// Policy with the standard delays and `max_retries` retries.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base: BACKOFF_BASE,
            cap: BACKOFF_CAP,
        }
    }

    /// Override the delay bounds; used by tests to avoid real waits.
    pub fn with_delays(mut self, base: Duration, cap: Duration) -> Self {
        self.base = base;
        self.cap = cap;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(retry.saturating_sub(1));
        let base_ms = u64::try_from(self.base.as_millis()).unwrap_or(u64::MAX);
        let cap_ms = u64::try_from(self.cap.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(cap_ms))
    }

    /// Run `op` until it succeeds or the retries are spent.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay(retry);
                    debug!(
                        %error,
                        operation,
                        retry,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying cache call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
