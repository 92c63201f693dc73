//! Image optimization endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::handlers::pagespeed::parse_http_url;
use crate::http::server::AppState;
use crate::http::ApiError;
use crate::services::media::{OptimizedImage, TransformOptions};

const MAX_DIMENSION: u32 = 10_000;

#[derive(Debug, Deserialize)]
pub struct ImageOptimizeRequest {
    /// Publicly reachable source image URL.
    pub url: String,
    #[serde(flatten)]
    pub options: TransformOptions,
}

pub async fn optimize(
    State(state): State<AppState>,
    Json(request): Json<ImageOptimizeRequest>,
) -> Result<Json<OptimizedImage>, ApiError> {
    let source = parse_http_url(&request.url)?;
    validate_options(&request.options)?;

    let optimized = state.media.optimize(&source, request.options).await?;
    Ok(Json(optimized))
}

fn validate_options(options: &TransformOptions) -> Result<(), ApiError> {
    for (name, value) in [("width", options.width), ("height", options.height)] {
        if let Some(v) = value {
            if v == 0 || v > MAX_DIMENSION {
                return Err(ApiError::Validation(format!(
                    "{name} must be between 1 and {MAX_DIMENSION}"
                )));
            }
        }
    }
    if let Some(quality) = options.quality {
        if quality == 0 || quality > 100 {
            return Err(ApiError::Validation("quality must be between 1 and 100".into()));
        }
    }
    Ok(())
}
