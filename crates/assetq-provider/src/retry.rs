//! Request pacing and retry policy.
//!
//! Every page fetch goes through a [`RetryPolicy`]: a fixed delay before each
//! attempt keeps the run under the provider's quota, and failed or empty
//! attempts are retried a fixed number of times.

use crate::error::{ProviderError, Result};
use assetq_core::{PacingConfig, Provider};
use std::future::Future;
use std::time::Duration;

/// Default attempts per page, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Pacing and retry settings for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before every attempt
    pub request_delay: Duration,
    /// Attempts per page, including the first
    pub max_attempts: u32,
    /// Delay after a failed or empty attempt
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            request_delay: Duration::ZERO,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy built from configured pacing for a provider.
    #[must_use]
    pub fn from_pacing(pacing: &PacingConfig, provider: Provider) -> Self {
        Self {
            request_delay: pacing.request_delay(provider),
            max_attempts: pacing.retry_attempts.max(1),
            retry_delay: Duration::from_millis(pacing.retry_delay_ms),
        }
    }

    /// Policy with no delays, for tests and offline replays.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            request_delay: Duration::ZERO,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::ZERO,
        }
    }

    /// Set the delay before every attempt.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Set the number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run `op` under this policy.
    ///
    /// Results rejected by `accept` (an empty page, typically) are retried
    /// like failures. Errors that are not retryable return immediately.
    ///
    /// # Errors
    /// Returns the first non-retryable error, or
    /// [`ProviderError::RetriesExhausted`] wrapping the final attempt's error.
    /// A result still rejected on the final attempt is reported as
    /// [`ProviderError::EmptyPage`].
    pub async fn execute<T, F, Fut>(
        &self,
        label: &str,
        mut op: F,
        accept: impl Fn(&T) -> bool,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match op().await {
                Ok(value) if accept(&value) => return Ok(value),
                Ok(_) if attempt >= max_attempts => {
                    return Err(ProviderError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(ProviderError::EmptyPage(label.to_string())),
                    });
                }
                Ok(_) => {
                    tracing::warn!(
                        "{} returned no rows (attempt {}/{}), retrying in {:?}...",
                        label,
                        attempt,
                        max_attempts,
                        self.retry_delay
                    );
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(ProviderError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:?}...",
                        label,
                        attempt,
                        max_attempts,
                        e,
                        self.retry_delay
                    );
                }
            }

            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}
