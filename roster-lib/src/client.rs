//! Main RosterClient

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::model::Record;

/// The production member feed.
pub const DEFAULT_ENDPOINT: &str =
    "https://geektrust.s3-ap-southeast-1.amazonaws.com/adminui-problem/members.json";

/// Client for the member feed.
///
/// This client is cheap to clone (uses `Arc` internally). A single
/// [`fetch_records`](Self::fetch_records) call issues exactly one GET; there
/// is no retry.
///
/// # Example
///
/// ```ignore
/// use roster_lib::{RosterClient, DEFAULT_ENDPOINT};
///
/// let client = RosterClient::builder()
///     .url(DEFAULT_ENDPOINT)
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let records = client.fetch_records().await?;
/// ```
#[derive(Clone)]
pub struct RosterClient {
    inner: Arc<RosterClientInner>,
}

struct RosterClientInner {
    url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl RosterClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RosterClientBuilder<Missing> {
        RosterClientBuilder::new()
    }

    /// Returns the feed URL.
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Fetches the full record collection.
    ///
    /// The body must be a JSON array of objects carrying at least `id`,
    /// `name`, `email` and `role`. Duplicate ids are passed through; the table
    /// keeps the first of each when loading.
    pub async fn fetch_records(&self) -> Result<Vec<Record>, ApiError> {
        info!("Fetching records from {}", self.inner.url);

        let result = self.fetch_inner().await;
        match &result {
            Ok(records) => info!("Loaded {} records", records.len()),
            Err(e) => error!(
                "Error fetching records (retryable: {}): {}",
                e.is_retryable(),
                e
            ),
        }
        result
    }

    async fn fetch_inner(&self) -> Result<Vec<Record>, ApiError> {
        let mut request = self.inner.http_client.get(self.inner.url.clone());

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http(status.as_u16(), body));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_records(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }
}

/// Parses a feed body into records, in feed order.
fn parse_records(body: &str) -> Result<Vec<Record>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`RosterClient`].
///
/// The feed URL is required; `build` is only available once it is set.
pub struct RosterClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl RosterClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the feed URL.
    pub fn url(self, url: impl Into<String>) -> RosterClientBuilder<Set<String>> {
        RosterClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for RosterClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> RosterClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RosterClientBuilder<Set<String>> {
    /// Builds the [`RosterClient`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<RosterClient, ApiError> {
        let url = Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::Network)?
            }
        };

        Ok(RosterClient {
            inner: Arc::new(RosterClientInner {
                url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
