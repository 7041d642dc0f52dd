//! Document fetcher.
//!
//! Issues one logical GET through a [`ResilientClient`] and maps the final
//! outcome to content or a classified [`FetchError`].

use std::future::Future;

use reqwest::{header, Response};
use tracing::{debug, instrument};

use crate::client::ResilientClient;
use crate::config::ClientConfig;
use crate::error::{FetchError, TransportError};

/// Fetches whole text documents.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: ResilientClient,
}

impl Fetcher {
    /// Creates a fetcher with its own client built from `config`.
    pub fn new(config: Option<ClientConfig>) -> Self {
        Self::with_client(ResilientClient::new(config))
    }

    /// Creates a fetcher over an existing client.
    pub fn with_client(client: ResilientClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    /// Fetches `url` and returns the response body.
    ///
    /// Status codes below 400 are success and the full body is returned.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NotFound`] for 404
    /// - [`FetchError::RateLimited`] for 429, with the `Retry-After` value
    /// - [`FetchError::Status`] for any other status >= 400
    /// - [`FetchError::Transport`] when no response was obtained
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        self.read(url, response).await
    }

    /// Like [`fetch`](Self::fetch), but aborts when `cancel` resolves.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch); cancellation surfaces as a transport
    /// error wrapping [`TransportError::Cancelled`].
    pub async fn fetch_or_cancel<F>(&self, url: &str, cancel: F) -> Result<String, FetchError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => Err(FetchError::transport(url, TransportError::Cancelled)),
            result = self.fetch(url) => result,
        }
    }

    /// Fetches the `llms.txt` document of a source.
    ///
    /// Uses `alternate` when `use_full` is set and an alternate URL is
    /// present, otherwise `primary`.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub async fn fetch_llms_txt(
        &self,
        primary: &str,
        alternate: Option<&str>,
        use_full: bool,
    ) -> Result<String, FetchError> {
        self.fetch(select_target(primary, alternate, use_full)).await
    }

    /// Like [`fetch_llms_txt`](Self::fetch_llms_txt), but aborts when
    /// `cancel` resolves.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_or_cancel`](Self::fetch_or_cancel).
    pub async fn fetch_llms_txt_or_cancel<F>(
        &self,
        primary: &str,
        alternate: Option<&str>,
        use_full: bool,
        cancel: F,
    ) -> Result<String, FetchError>
    where
        F: Future<Output = ()>,
    {
        self.fetch_or_cancel(select_target(primary, alternate, use_full), cancel)
            .await
    }

    /// Releases the client.
    ///
    /// Other clones of the client keep their connections and breaker.
    pub fn close(self) {
        debug!("Closing fetcher");
        drop(self.client);
    }

    async fn read(&self, url: &str, response: Response) -> Result<String, FetchError> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(err) = FetchError::from_status(url, status, retry_after) {
            debug!(status, kind = %err.kind(), "Fetch failed");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, TransportError::from(e)))?;

        if self.client.config().verbose {
            debug!(status, bytes = body.len(), body = %body, "Response body");
        } else {
            debug!(status, bytes = body.len(), "Fetched document");
        }

        Ok(body)
    }
}

/// Chooses the URL to fetch for a source.
///
/// An empty alternate counts as absent.
pub fn select_target<'a>(primary: &'a str, alternate: Option<&'a str>, use_full: bool) -> &'a str {
    match alternate {
        Some(alt) if use_full && !alt.is_empty() => alt,
        _ => primary,
    }
}
