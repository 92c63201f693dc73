//! Image CDN client.
//!
//! Delegates image optimization to the CDN's fetch API: the CDN pulls the
//! source URL, applies the requested transform, and returns a delivery URL.
//! No image bytes ever flow through this server.

use serde::{Deserialize, Serialize};

use crate::config::schema::MediaConfig;
use crate::services::ServiceError;

/// Output format accepted by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Webp,
    Avif,
    Jpeg,
    Png,
}

/// Transform parameters forwarded to the CDN. All optional; an empty set
/// requests plain re-hosting with default compression.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct TransformOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Compression quality, 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
}

#[derive(Debug, Serialize)]
struct FetchRequest<'a> {
    source: &'a str,
    #[serde(flatten)]
    options: TransformOptions,
}

/// The CDN's answer: where the optimized asset lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizedImage {
    pub url: String,
    #[serde(default)]
    pub bytes: Option<u64>,
}

pub struct MediaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MediaClient {
    pub fn new(http: reqwest::Client, config: &MediaConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
        }
    }

    /// Ask the CDN to fetch and transform `source`.
    ///
    /// Not retried: the fetch is not idempotent on the CDN side (it may
    /// bill per ingest).
    pub async fn optimize(
        &self,
        source: &url::Url,
        options: TransformOptions,
    ) -> Result<OptimizedImage, ServiceError> {
        let endpoint = format!("{}/fetch", self.base_url);
        let mut request = self.http.post(&endpoint).json(&FetchRequest {
            source: source.as_str(),
            options,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        response
            .json::<OptimizedImage>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}
