//! Client configuration.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default number of re-attempts after the first request.
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Default base backoff between attempts.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(100);
/// Default upper bound on backoff between attempts.
pub const DEFAULT_RETRY_MAX_WAIT: Duration = Duration::from_secs(2);

/// Consecutive failures that open the breaker.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
/// Consecutive half-open successes that close the breaker.
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 1;
/// Time the breaker stays open before allowing a trial request.
pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for [`ResilientClient`](crate::client::ResilientClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for a single attempt.
    pub timeout: Duration,
    /// Number of re-attempts after the first request fails.
    pub retry_count: u32,
    /// Base backoff between attempts.
    pub retry_wait: Duration,
    /// Upper bound on backoff between attempts.
    pub retry_max_wait: Duration,
    /// Log full request/response details at debug level.
    pub verbose: bool,
    /// Circuit breaker settings.
    pub breaker: BreakerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait: DEFAULT_RETRY_WAIT,
            retry_max_wait: DEFAULT_RETRY_MAX_WAIT,
            verbose: false,
            breaker: BreakerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry count.
    #[must_use]
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Sets the backoff bounds.
    #[must_use]
    pub fn with_retry_wait(mut self, base: Duration, max: Duration) -> Self {
        self.retry_wait = base;
        self.retry_max_wait = max;
        self
    }

    /// Enables or disables verbose request logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the circuit breaker configuration.
    #[must_use]
    pub fn with_breaker(mut self, breaker: BreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Returns a copy that satisfies the config invariants.
    ///
    /// A zero timeout falls back to [`DEFAULT_TIMEOUT`] and a max backoff
    /// below the base backoff is raised to the base.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.timeout.is_zero() {
            warn!(default = ?DEFAULT_TIMEOUT, "Zero timeout configured, using default");
            self.timeout = DEFAULT_TIMEOUT;
        }

        if self.retry_max_wait < self.retry_wait {
            warn!(
                retry_wait = ?self.retry_wait,
                retry_max_wait = ?self.retry_max_wait,
                "Max retry wait below base wait, raising to base"
            );
            self.retry_max_wait = self.retry_wait;
        }

        self.breaker = self.breaker.normalized();
        self
    }
}

// ============================================================================
// Breaker Config
// ============================================================================

/// Circuit breaker thresholds and trip policy.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures (while closed) that open the breaker.
    pub failure_threshold: u32,
    /// Consecutive successes (while half-open) that close the breaker.
    pub success_threshold: u32,
    /// How long the breaker stays open before a trial request is let through.
    pub reset_timeout: Duration,
    /// Which attempt outcomes count as failures.
    pub policy: FailurePolicy,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
            policy: FailurePolicy::default(),
        }
    }
}

impl BreakerConfig {
    fn normalized(mut self) -> Self {
        self.failure_threshold = self.failure_threshold.max(1);
        self.success_threshold = self.success_threshold.max(1);
        self
    }
}

/// Classifies an attempt outcome as a breaker failure.
///
/// `None` stands for an attempt that produced no HTTP response.
#[derive(Debug, Clone, Copy, Default)]
pub enum FailurePolicy {
    /// 5xx responses only.
    #[default]
    ServerErrors,
    /// 5xx responses and transport failures.
    ServerAndTransportErrors,
    /// Any response with status >= 400 and transport failures.
    AnyError,
    /// Caller-supplied classifier.
    Custom(fn(Option<StatusCode>) -> bool),
}

impl FailurePolicy {
    /// Returns true if the outcome counts against the breaker.
    pub fn is_failure(&self, status: Option<StatusCode>) -> bool {
        match (self, status) {
            (Self::Custom(f), status) => f(status),
            (Self::ServerErrors, None) => false,
            (Self::ServerAndTransportErrors | Self::AnyError, None) => true,
            (Self::ServerErrors | Self::ServerAndTransportErrors, Some(s)) => s.is_server_error(),
            (Self::AnyError, Some(s)) => s.is_client_error() || s.is_server_error(),
        }
    }
}
