//! Circuit breaker shared by every request made through one client.
//!
//! # States
//! - Closed: normal operation, attempts pass through
//! - Open: endpoint assumed down, attempts fail fast without network I/O
//! - Half-Open: trial attempts are let through to detect recovery
//!
//! # State Transitions
//! ```text
//! Closed   → Open:     consecutive failures >= failure_threshold
//! Open     → HalfOpen: reset_timeout elapsed since entering Open
//! HalfOpen → Closed:   consecutive successes >= success_threshold
//! HalfOpen → Open:     any failure (reset timer restarts)
//! ```
//!
//! The Open → HalfOpen transition is evaluated lazily by [`CircuitBreaker::permit`],
//! and the attempt that triggers it is the trial request.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BreakerConfig;

// ============================================================================
// Circuit State
// ============================================================================

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitState {
    /// Requests flow through.
    Closed,
    /// Requests fail fast.
    Open,
    /// Trial requests are allowed.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Returned by [`CircuitBreaker::permit`] when the breaker is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("circuit breaker is open, retry in {retry_in:?}")]
pub struct CircuitOpen {
    /// Time left until a trial request will be allowed.
    pub retry_in: Duration,
}

/// Point-in-time view of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    /// Current state.
    pub state: CircuitState,
    /// Consecutive failures counted so far.
    pub consecutive_failures: u32,
    /// Consecutive successes counted so far.
    pub consecutive_successes: u32,
    /// Time spent in the current state.
    pub in_state_for: Duration,
}

type StateListener = Box<dyn Fn(CircuitState, CircuitState) + Send + Sync>;

struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    changed_at: Instant,
}

impl BreakerState {
    /// Moves to `to`, resetting counters. Returns the transition for notification.
    fn transition(&mut self, to: CircuitState) -> Option<(CircuitState, CircuitState)> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        self.consecutive_failures = 0;
        self.consecutive_successes = 0;
        self.changed_at = Instant::now();
        Some((from, to))
    }
}

// ============================================================================
// Circuit Breaker
// ============================================================================

/// Consecutive-count circuit breaker.
///
/// All counter updates and transitions happen under one mutex, so concurrent
/// callers never lose updates or double-transition. State change listeners
/// run after the lock is released.
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: Mutex<BreakerState>,
    listeners: RwLock<Vec<StateListener>>,
}

impl CircuitBreaker {
    /// Creates a closed breaker.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                changed_at: Instant::now(),
            }),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the breaker configuration.
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Registers a callback invoked with `(from, to)` on every transition.
    pub fn on_state_change<F>(&self, listener: F)
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Returns the current state without applying the reset timeout.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Returns a consistent view of state and counters.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let state = self.lock();
        BreakerSnapshot {
            state: state.state,
            consecutive_failures: state.consecutive_failures,
            consecutive_successes: state.consecutive_successes,
            in_state_for: state.changed_at.elapsed(),
        }
    }

    /// Asks whether an attempt may be made now.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitOpen`] if the breaker is open and the reset timeout
    /// has not yet elapsed.
    pub fn permit(&self) -> Result<(), CircuitOpen> {
        let mut state = self.lock();

        if state.state != CircuitState::Open {
            return Ok(());
        }

        let elapsed = state.changed_at.elapsed();
        if elapsed < self.config.reset_timeout {
            return Err(CircuitOpen {
                retry_in: self.config.reset_timeout - elapsed,
            });
        }

        let change = state.transition(CircuitState::HalfOpen);
        drop(state);
        self.notify(change);
        Ok(())
    }

    /// Records an attempt outcome, classified by the configured policy.
    ///
    /// `None` means the attempt produced no HTTP response. A missing
    /// response that the policy does not count as a failure is ignored.
    pub fn record(&self, status: Option<StatusCode>) {
        if self.config.policy.is_failure(status) {
            self.record_failure();
        } else if status.is_some() {
            self.record_success();
        }
    }

    /// Records a successful attempt.
    pub fn record_success(&self) {
        let mut state = self.lock();

        let change = match state.state {
            CircuitState::Closed => {
                state.consecutive_failures = 0;
                None
            }
            CircuitState::HalfOpen => {
                state.consecutive_successes += 1;
                if state.consecutive_successes >= self.config.success_threshold {
                    state.transition(CircuitState::Closed)
                } else {
                    None
                }
            }
            // Late result from an attempt admitted before the breaker opened.
            CircuitState::Open => None,
        };

        drop(state);
        self.notify(change);
    }

    /// Records a failed attempt.
    pub fn record_failure(&self) {
        let mut state = self.lock();

        let change = match state.state {
            CircuitState::Closed => {
                state.consecutive_failures += 1;
                debug!(
                    failures = state.consecutive_failures,
                    threshold = self.config.failure_threshold,
                    "Circuit breaker recorded failure"
                );
                if state.consecutive_failures >= self.config.failure_threshold {
                    state.transition(CircuitState::Open)
                } else {
                    None
                }
            }
            CircuitState::HalfOpen => state.transition(CircuitState::Open),
            CircuitState::Open => None,
        };

        drop(state);
        self.notify(change);
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, change: Option<(CircuitState, CircuitState)>) {
        let Some((from, to)) = change else {
            return;
        };

        warn!(from = %from, to = %to, "circuit breaker state changed");

        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(from, to);
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
