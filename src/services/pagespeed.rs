//! Google PageSpeed Insights client.
//!
//! Thin wrapper over the `runPagespeed` endpoint: build the query, retry
//! the GET if the API hiccups, and pull the handful of fields the tool
//! page actually shows out of the (very large) Lighthouse payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::schema::PagespeedConfig;
use crate::services::retry::{send_with_retry, RetryPolicy};
use crate::services::ServiceError;

/// Analysis strategy accepted by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

/// The subset of the Lighthouse result surfaced to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PagespeedSummary {
    pub analyzed_url: String,
    pub strategy: Strategy,
    /// Performance score on a 0-100 scale, when the API reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocking_time: Option<String>,
}

pub struct PagespeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl PagespeedClient {
    pub fn new(http: reqwest::Client, config: &PagespeedConfig, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
            retry,
        }
    }

    /// Run an analysis for `target` and distill the response.
    pub async fn analyze(
        &self,
        target: &Url,
        strategy: Strategy,
    ) -> Result<PagespeedSummary, ServiceError> {
        let endpoint = format!("{}/runPagespeed", self.base_url);
        let mut request = self.http.get(&endpoint).query(&[
            ("url", target.as_str()),
            ("strategy", strategy.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = send_with_retry(request, self.retry).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(summarize(target, strategy, &payload))
    }
}

fn summarize(target: &Url, strategy: Strategy, payload: &Value) -> PagespeedSummary {
    let lighthouse = &payload["lighthouseResult"];
    // The API reports the score as 0..1; tool pages show 0..100.
    let performance_score = lighthouse["categories"]["performance"]["score"]
        .as_f64()
        .map(|score| (score * 100.0).round());

    let audit = |name: &str| {
        lighthouse["audits"][name]["displayValue"]
            .as_str()
            .map(str::to_string)
    };

    PagespeedSummary {
        analyzed_url: target.to_string(),
        strategy,
        performance_score,
        first_contentful_paint: audit("first-contentful-paint"),
        largest_contentful_paint: audit("largest-contentful-paint"),
        total_blocking_time: audit("total-blocking-time"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_extracts_score_and_audits() {
        let payload = serde_json::json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.93 } },
                "audits": {
                    "first-contentful-paint": { "displayValue": "1.2 s" },
                    "total-blocking-time": { "displayValue": "30 ms" }
                }
            }
        });
        let target = Url::parse("https://example.com/").unwrap();
        let summary = summarize(&target, Strategy::Mobile, &payload);
        assert_eq!(summary.performance_score, Some(93.0));
        assert_eq!(summary.first_contentful_paint.as_deref(), Some("1.2 s"));
        assert_eq!(summary.largest_contentful_paint, None);
        assert_eq!(summary.total_blocking_time.as_deref(), Some("30 ms"));
    }

    #[test]
    fn test_summarize_tolerates_missing_fields() {
        let target = Url::parse("https://example.com/").unwrap();
        let summary = summarize(&target, Strategy::Desktop, &serde_json::json!({}));
        assert_eq!(summary.performance_score, None);
        assert_eq!(summary.first_contentful_paint, None);
    }
}
