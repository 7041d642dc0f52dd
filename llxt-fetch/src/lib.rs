// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # llxt Fetch
//!
//! Resilient single-document HTTP fetching for llxt.
//!
//! - [`client::ResilientClient`] - HTTP client with retry and circuit breaker
//! - [`breaker::CircuitBreaker`] - Closed/Open/HalfOpen failure guard
//! - [`retry::RetryStrategy`] - Bounded exponential backoff
//! - [`fetcher::Fetcher`] - Maps final responses to content or [`FetchError`]
//!
//! ## Example
//!
//! ```ignore
//! use llxt_fetch::{ClientConfig, Fetcher};
//!
//! let fetcher = Fetcher::new(Some(ClientConfig::default().with_retry_count(1)));
//! let text = fetcher
//!     .fetch_llms_txt("https://hono.dev/llms.txt", Some("https://hono.dev/llms-full.txt"), true)
//!     .await?;
//! ```

pub mod breaker;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod retry;

pub use breaker::{BreakerSnapshot, CircuitBreaker, CircuitOpen, CircuitState};
pub use client::ResilientClient;
pub use config::{BreakerConfig, ClientConfig, FailurePolicy};
pub use error::{FetchError, FetchErrorKind, TransportError, RATE_LIMIT_HINT};
pub use fetcher::{select_target, Fetcher};
pub use retry::RetryStrategy;
