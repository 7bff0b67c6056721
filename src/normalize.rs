use crate::theme::resolve_theme_color;
use crate::{FetchError, PreviewMetadata};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

pub const TITLE_FALLBACK: &str = "No title available";
pub const DESCRIPTION_FALLBACK: &str = "No description available";

const THEME_COLOR_KEY: &str = "theme-color";

/// Top-level body returned by the metadata service.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataEnvelope {
    pub data: Map<String, Value>,
}

impl MetadataEnvelope {
    /// Parses a raw response body. A body that is not UTF-8 JSON, or lacks an
    /// object-valued `data` field, is a [`FetchError::Parse`].
    pub fn from_body(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Maps service fields onto a [`PreviewMetadata`] record
#[derive(Clone, Debug, Default)]
pub struct MetadataNormalizer;

impl MetadataNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// `og:` keys win over plain keys; a key only counts when it holds a
    /// non-blank string.
    pub fn normalize(&self, envelope: &MetadataEnvelope, url: &str) -> PreviewMetadata {
        let data = &envelope.data;

        let title = pick(data, "og:title", "title");
        let description = pick(data, "og:description", "description");
        let image = pick(data, "og:image", "image");
        let canonical_url = pick(data, "og:url", "url");

        debug!(
            url = %url,
            has_title = title.is_some(),
            has_description = description.is_some(),
            has_image = image.is_some(),
            has_canonical = canonical_url.is_some(),
            "Normalized metadata response"
        );

        PreviewMetadata {
            title: title.unwrap_or(TITLE_FALLBACK).to_string(),
            description: description.unwrap_or(DESCRIPTION_FALLBACK).to_string(),
            image: image.unwrap_or_default().to_string(),
            canonical_url: canonical_url.unwrap_or(url).to_string(),
            theme_color: resolve_theme_color(string_field(data, THEME_COLOR_KEY), url),
        }
    }
}

fn pick<'a>(data: &'a Map<String, Value>, og_key: &str, plain_key: &str) -> Option<&'a str> {
    string_field(data, og_key).or_else(|| string_field(data, plain_key))
}

fn string_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
