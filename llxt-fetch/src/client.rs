//! Resilient HTTP client.
//!
//! [`ResilientClient`] wraps a [`reqwest::Client`] with two layers: a bounded
//! retry loop driven by [`RetryStrategy`] and a [`CircuitBreaker`] that is
//! consulted before every attempt. Clones share the same breaker.

use std::future::Future;
use std::sync::Arc;

use reqwest::{header, Client, Request, Response};
use tracing::{debug, instrument, warn};

use crate::breaker::CircuitBreaker;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::retry::RetryStrategy;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("llxt/", env!("CARGO_PKG_VERSION"));

/// Accept header sent with every request.
pub const ACCEPT: &str = "text/plain, text/markdown;q=0.9, */*;q=0.8";

/// HTTP client with retry and circuit breaker policies.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    inner: Result<Client, String>,
    config: Arc<ClientConfig>,
    retry: RetryStrategy,
    breaker: Arc<CircuitBreaker>,
}

impl ResilientClient {
    /// Creates a client from `config`, or from defaults when `None`.
    ///
    /// Never fails. If the underlying HTTP client cannot be built, every
    /// request made through the returned client fails with
    /// [`TransportError::ClientUnavailable`].
    pub fn new(config: Option<ClientConfig>) -> Self {
        let config = config.unwrap_or_default().normalized();

        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                warn!(error = %e, "Failed to build HTTP client");
                e.to_string()
            });

        Self {
            inner,
            retry: RetryStrategy::from_config(&config),
            breaker: Arc::new(CircuitBreaker::new(config.breaker.clone())),
            config: Arc::new(config),
        }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the retry strategy in use.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry
    }

    /// Returns the circuit breaker shared by this client and its clones.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Performs a GET request through the retry and breaker layers.
    ///
    /// Returns the first non-retryable response, or the last response once
    /// attempts are exhausted. Status codes are not interpreted here.
    ///
    /// If the breaker opens while retrying a response, the last response is
    /// returned instead of [`TransportError::CircuitOpen`].
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response was obtained, including
    /// [`TransportError::CircuitOpen`] when the breaker rejects an attempt.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let client = match &self.inner {
            Ok(client) => client,
            Err(reason) => return Err(TransportError::ClientUnavailable(reason.clone())),
        };

        let mut attempt = 0u32;
        let mut last_response: Option<Response> = None;
        loop {
            attempt += 1;

            if let Err(open) = self.breaker.permit() {
                return match last_response {
                    Some(response) => {
                        debug!(
                            url = %url,
                            attempt,
                            status = response.status().as_u16(),
                            "circuit opened mid-request, returning last response"
                        );
                        Ok(response)
                    }
                    None => Err(open.into()),
                };
            }

            let request = build_request(client, url)?;
            if self.config.verbose {
                debug!(
                    method = %request.method(),
                    url = %request.url(),
                    attempt,
                    headers = ?request.headers(),
                    "Sending request"
                );
            }

            match client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    self.breaker.record(Some(status));

                    if self.config.verbose {
                        debug!(
                            status = status.as_u16(),
                            headers = ?response.headers(),
                            "Received response"
                        );
                    }

                    if self.retry.should_retry_status(status)
                        && self.retry.has_attempts_left(attempt)
                    {
                        let retry_after = response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let delay = self.retry.delay_with_hint(attempt, retry_after.as_deref());

                        debug!(
                            url = %url,
                            attempt,
                            status = status.as_u16(),
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying request"
                        );
                        last_response = Some(response);
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    self.breaker.record(None);

                    if self.retry.should_retry_error(&e) && self.retry.has_attempts_left(attempt) {
                        let delay = self.retry.delay_for_retry(attempt);
                        debug!(
                            url = %url,
                            attempt,
                            error = %e,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(e.into());
                }
            }
        }
    }

    /// Like [`get`](Self::get), but aborts when `cancel` resolves.
    ///
    /// Cancellation drops the in-flight attempt or backoff sleep and no
    /// further attempts are started.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Cancelled`] if `cancel` resolves first,
    /// otherwise whatever [`get`](Self::get) returns.
    pub async fn get_or_cancel<F>(&self, url: &str, cancel: F) -> Result<Response, TransportError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                debug!(url = %url, "Request cancelled");
                Err(TransportError::Cancelled)
            }
            result = self.get(url) => result,
        }
    }
}

/// Builds one GET attempt with the headers every request carries.
fn build_request(client: &Client, url: &str) -> Result<Request, reqwest::Error> {
    client
        .get(url)
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::ACCEPT, ACCEPT)
        .build()
}

impl Default for ResilientClient {
    fn default() -> Self {
        Self::new(None)
    }
}
