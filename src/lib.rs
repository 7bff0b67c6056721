use async_trait::async_trait;

mod error;
mod fetcher;
#[cfg(feature = "logging")]
mod logging;
mod normalize;
mod session;
pub mod theme;
mod utils;

pub use error::FetchError;
pub use fetcher::{FetcherConfig, MetadataFetcher, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_preview_card, setup_logging, LogConfig, LogLevelGuard};
pub use normalize::{MetadataEnvelope, MetadataNormalizer, DESCRIPTION_FALLBACK, TITLE_FALLBACK};
pub use session::{LoadOutcome, PreviewSession, PreviewSnapshot, PreviewState};
pub use utils::hostname_of;

/// Display fields for one link preview card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMetadata {
    pub title: String,
    pub description: String,
    /// Empty when the page has no preview image.
    pub image: String,
    pub canonical_url: String,
    pub theme_color: String,
}

impl PreviewMetadata {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Anything that can turn a URL into preview metadata.
#[async_trait]
pub trait PreviewSource: Send + Sync {
    async fn fetch_preview(&self, url: &str) -> Result<PreviewMetadata, FetchError>;
}
