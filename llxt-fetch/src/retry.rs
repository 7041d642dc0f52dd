//! Retry strategy for HTTP requests.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;

use crate::config::ClientConfig;

/// Strategy for retrying failed attempts.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Number of re-attempts after the first attempt.
    pub retry_count: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Whether to add up to 10% random jitter to computed delays.
    pub jitter: bool,
}

impl RetryStrategy {
    /// Creates a strategy with the given retry count and default bounds.
    pub fn new(retry_count: u32) -> Self {
        Self {
            retry_count,
            ..Self::from_config(&ClientConfig::default())
        }
    }

    /// Builds the strategy described by a client config.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            base_delay: config.retry_wait,
            max_delay: config.retry_max_wait.max(config.retry_wait),
            jitter: true,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            retry_count: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Enables or disables jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts a request may make.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Returns true if another attempt may follow attempt number `attempt` (1-based).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Calculates the delay before re-attempt number `retry` (1-based).
    ///
    /// Grows exponentially from the base delay and always stays within
    /// `[base_delay, max_delay]`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let delay = self
            .base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay);

        let delay = if self.jitter {
            let range = delay.as_millis() / 10;
            if range > 0 {
                let range = u64::try_from(range).unwrap_or(u64::MAX);
                delay + Duration::from_millis(rand::thread_rng().gen_range(0..range))
            } else {
                delay
            }
        } else {
            delay
        };

        delay.max(self.base_delay).min(self.max_delay)
    }

    /// Delay before the next attempt, honoring a server `Retry-After` hint.
    ///
    /// A hint in whole seconds replaces the computed backoff but is still
    /// capped at `max_delay`.
    pub fn delay_with_hint(&self, retry: u32, retry_after: Option<&str>) -> Duration {
        match retry_after.and_then(parse_retry_after) {
            Some(hint) => hint.min(self.max_delay),
            None => self.delay_for_retry(retry),
        }
    }

    /// Determines if a request error should be retried.
    ///
    /// Every transport failure is retryable; a request that could not even be
    /// built is not.
    pub fn should_retry_error(&self, error: &reqwest::Error) -> bool {
        !error.is_builder()
    }

    /// Determines if a response status should be retried.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Parses a `Retry-After` value given in seconds.
///
/// HTTP-date values are not interpreted and yield `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
