//! Retry Policy for LLM Call Sites
//!
//! A `RetryPolicy` is a plain value describing an exponential backoff
//! schedule. Each component holds its own policy; classification of what is
//! worth retrying lives on `LlmError::is_retryable`, so the policy itself
//! stays mechanism-only.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;
use crate::constants::retry;
use crate::types::LlmError;

/// Exponential backoff schedule for one call site
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied per retry
    pub factor: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::extractor(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Schedule used by the architecture extractor and content generator
    /// (2s, 4s, 8s by default)
    pub fn extractor(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_secs(config.extractor_base_delay_secs),
            factor: retry::FACTOR,
        }
    }

    /// Schedule used by the file selector (1s, 2s, 4s by default)
    pub fn selector(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_secs(config.selector_base_delay_secs),
            factor: retry::FACTOR,
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(self.factor)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }

    /// Run `op`, retrying on retryable `LlmError`s per this schedule.
    /// Terminal categories (auth, bad request, unknown) propagate immediately.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        op.retry(self.backoff())
            .when(|err: &LlmError| err.is_retryable())
            .notify(|err, delay| {
                warn!(error = %err, delay_secs = delay.as_secs_f32(), "retrying LLM call");
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            factor: 2.0,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = AtomicUsize::new(0);
        let result = fast_policy()
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(LlmError::new(ErrorCategory::Transient, "overloaded"))
                } else {
                    Ok(n)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_fails_fast() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = fast_policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::new(ErrorCategory::Auth, "bad key"))
            })
            .await;
        assert_eq!(result.unwrap_err().category, ErrorCategory::Auth);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_propagate_last_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = fast_policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::new(ErrorCategory::RateLimit, "429"))
            })
            .await;
        assert_eq!(result.unwrap_err().category, ErrorCategory::RateLimit);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
