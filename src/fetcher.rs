use crate::normalize::{MetadataEnvelope, MetadataNormalizer};
use crate::{FetchError, PreviewMetadata, PreviewSource};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use std::time::Duration;
use tracing::{debug, error, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://open-apis.hax.cloud/api/services/website/metadata";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Talks to the metadata service and normalizes its answers.
///
/// # Examples
/// ```ignore
/// let fetcher = MetadataFetcher::new()?;
/// let preview = fetcher.fetch_preview("https://hax.psu.edu").await?;
/// println!("{} ({})", preview.title, preview.theme_color);
/// ```
#[derive(Clone)]
pub struct MetadataFetcher {
    client: Client,
    endpoint: String,
    timeout: Duration,
    normalizer: MetadataNormalizer,
}

impl MetadataFetcher {
    pub fn new() -> Result<Self, FetchError> {
        debug!("Fetcher initialized with default configuration");
        Self::new_with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with custom configuration
    pub fn new_with_config(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut client_builder = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout);

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            FetchError::Network(format!("Failed to initialize HTTP client: {e}"))
        })?;

        Ok(Self::with_client(client, config.endpoint).timeout(config.timeout))
    }

    /// Uses a caller-built client. Requests are still bounded by
    /// [`DEFAULT_TIMEOUT`] unless [`MetadataFetcher::timeout`] changes it.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            normalizer: MetadataNormalizer::new(),
        }
    }

    /// Bound applied to every request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches and normalizes metadata for `url`.
    ///
    /// `url` is forwarded unvalidated as the `q` query parameter.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_preview(&self, url: &str) -> Result<PreviewMetadata, FetchError> {
        let envelope = self.fetch_envelope(url).await?;
        Ok(self.normalizer.normalize(&envelope, url))
    }

    async fn fetch_envelope(&self, url: &str) -> Result<MetadataEnvelope, FetchError> {
        debug!(url = %url, endpoint = %self.endpoint, "Starting metadata request");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", url)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, url = %url, "Failed to send request");
                FetchError::from_reqwest(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            debug!(error = %e, url = %url, "Failed to read response body");
            FetchError::from_reqwest(e)
        })?;

        debug!(url = %url, content_length = body.len(), "Received metadata response");
        MetadataEnvelope::from_body(&body)
    }
}

#[async_trait]
impl PreviewSource for MetadataFetcher {
    async fn fetch_preview(&self, url: &str) -> Result<PreviewMetadata, FetchError> {
        MetadataFetcher::fetch_preview(self, url).await
    }
}

/// Settings for [`MetadataFetcher::new_with_config`].
///
/// ```ignore
/// let fetcher = MetadataFetcher::new_with_config(FetcherConfig {
///     endpoint: "http://localhost:3000/api/services/website/metadata".to_string(),
///     timeout: Duration::from_secs(2),
///     ..Default::default()
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub headers: Option<HeaderMap>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("link_preview/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: None,
        }
    }
}

impl FetcherConfig {
    /// Defaults overridden by `LINK_PREVIEW_ENDPOINT`, `LINK_PREVIEW_USER_AGENT`
    /// and `LINK_PREVIEW_TIMEOUT_SECS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("LINK_PREVIEW_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            debug!(endpoint = %endpoint, "Using metadata endpoint from environment");
            config.endpoint = endpoint.trim().to_string();
        }

        if let Some(agent) = lookup("LINK_PREVIEW_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }

        if let Some(raw) = lookup("LINK_PREVIEW_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => debug!(value = %raw, "Ignoring invalid LINK_PREVIEW_TIMEOUT_SECS"),
            }
        }

        config
    }
}
