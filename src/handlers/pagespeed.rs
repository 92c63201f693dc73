//! PageSpeed analysis endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use url::Url;

use crate::http::server::AppState;
use crate::http::ApiError;
use crate::services::pagespeed::{PagespeedSummary, Strategy};

#[derive(Debug, Deserialize)]
pub struct PagespeedRequest {
    pub url: String,
    #[serde(default)]
    pub strategy: Strategy,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<PagespeedRequest>,
) -> Result<Json<PagespeedSummary>, ApiError> {
    let target = parse_http_url(&request.url)?;
    let summary = state.pagespeed.analyze(&target, request.strategy).await?;
    Ok(Json(summary))
}

pub(crate) fn parse_http_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|e| ApiError::Validation(format!("invalid URL: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ApiError::Validation(format!(
            "unsupported URL scheme {:?}, expected http or https",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url_accepts_https() {
        assert!(parse_http_url("https://example.com/page").is_ok());
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("ftp://example.com").is_err());
        assert!(parse_http_url("javascript:alert(1)").is_err());
        assert!(parse_http_url("not a url").is_err());
    }
}
