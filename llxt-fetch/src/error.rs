//! Fetch error types.

use std::fmt;

use thiserror::Error;

use crate::breaker::CircuitOpen;

/// Hint attached to rate-limited errors.
pub const RATE_LIMIT_HINT: &str = "Wait before retrying or use a different source";

// ============================================================================
// Error Kind
// ============================================================================

/// Closed set of fetch failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// HTTP 404.
    NotFound,
    /// HTTP 429.
    RateLimited,
    /// No HTTP response was obtained.
    Transport,
    /// Any other HTTP status >= 400.
    ServerOrClientError,
}

impl FetchErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FetchErrorKind::NotFound => "not_found",
            FetchErrorKind::RateLimited => "rate_limited",
            FetchErrorKind::Transport => "network_failure",
            FetchErrorKind::ServerOrClientError => "http_error",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Classified outcome of a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered 404.
    #[error("resource not found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The server answered 429.
    #[error("rate limited by server: {url}")]
    RateLimited {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// `Retry-After` header value, verbatim.
        retry_after: Option<String>,
    },

    /// The server answered with another error status.
    #[error("HTTP error {status}: {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// No HTTP response was obtained.
    #[error("failed to fetch content from {url}: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying cause.
        #[source]
        source: TransportError,
    },
}

impl FetchError {
    /// Classifies a final HTTP status. Returns `None` for statuses below 400.
    pub fn from_status(url: &str, status: u16, retry_after: Option<String>) -> Option<Self> {
        let url = url.to_string();
        match status {
            404 => Some(FetchError::NotFound { url, status }),
            429 => Some(FetchError::RateLimited {
                url,
                status,
                retry_after,
            }),
            s if s >= 400 => Some(FetchError::Status { url, status }),
            _ => None,
        }
    }

    /// Wraps a transport failure.
    pub fn transport(url: &str, source: TransportError) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NotFound { .. } => FetchErrorKind::NotFound,
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
            FetchError::Status { .. } => FetchErrorKind::ServerOrClientError,
            FetchError::Transport { .. } => FetchErrorKind::Transport,
        }
    }

    /// Returns the URL that was requested.
    pub fn url(&self) -> &str {
        match self {
            FetchError::NotFound { url, .. }
            | FetchError::RateLimited { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Transport { url, .. } => url,
        }
    }

    /// Returns the HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound { status, .. }
            | FetchError::RateLimited { status, .. }
            | FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { .. } => None,
        }
    }

    /// Returns the `Retry-After` value of a rate-limited response.
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            FetchError::RateLimited { retry_after, .. } => retry_after.as_deref(),
            _ => None,
        }
    }

    /// Returns an advisory hint for the caller, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FetchError::RateLimited { .. } => Some(RATE_LIMIT_HINT),
            _ => None,
        }
    }

    /// Returns true if the request was rejected by an open circuit breaker.
    pub fn is_circuit_open(&self) -> bool {
        matches!(
            self,
            FetchError::Transport {
                source: TransportError::CircuitOpen(_),
                ..
            }
        )
    }

    /// Returns the structured context as key/value pairs.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        let mut ctx = vec![("url", self.url().to_string())];
        if let Some(status) = self.status() {
            ctx.push(("status", status.to_string()));
        }
        if let Some(retry_after) = self.retry_after() {
            ctx.push(("retry_after", retry_after.to_string()));
        }
        if self.is_circuit_open() {
            ctx.push(("circuit", "open".to_string()));
        }
        ctx
    }
}

// ============================================================================
// Transport Error
// ============================================================================

/// Reasons an attempt produced no HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, timeout or body read failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Rejected without a network attempt because the breaker is open.
    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpen),

    /// The caller cancelled the fetch.
    #[error("request cancelled")]
    Cancelled,

    /// The HTTP client could not be constructed.
    #[error("HTTP client unavailable: {0}")]
    ClientUnavailable(String),
}

impl TransportError {
    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Request(e) if e.is_timeout())
    }
}
