//! JSON format/minify/validate tool.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    Format,
    Minify,
    Validate,
}

#[derive(Debug, Deserialize)]
pub struct JsonRequest {
    pub input: String,
    pub mode: JsonMode,
}

#[derive(Debug, Serialize)]
pub struct JsonResponse {
    pub mode: JsonMode,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Format and minify reject broken input with a 400; validate always
/// answers 200 and reports validity in the body, since "is this valid?"
/// is the question that tool exists to answer.
pub async fn process(Json(request): Json<JsonRequest>) -> Result<Json<JsonResponse>, ApiError> {
    let parsed: Result<Value, _> = serde_json::from_str(&request.input);

    let response = match (request.mode, parsed) {
        (JsonMode::Validate, Ok(_)) => JsonResponse {
            mode: request.mode,
            valid: true,
            output: None,
            error: None,
        },
        (JsonMode::Validate, Err(e)) => JsonResponse {
            mode: request.mode,
            valid: false,
            output: None,
            error: Some(e.to_string()),
        },
        (JsonMode::Format, Ok(value)) => JsonResponse {
            mode: request.mode,
            valid: true,
            output: Some(
                serde_json::to_string_pretty(&value)
                    .map_err(|e| ApiError::Internal(e.to_string()))?,
            ),
            error: None,
        },
        (JsonMode::Minify, Ok(value)) => JsonResponse {
            mode: request.mode,
            valid: true,
            output: Some(
                serde_json::to_string(&value).map_err(|e| ApiError::Internal(e.to_string()))?,
            ),
            error: None,
        },
        (JsonMode::Format | JsonMode::Minify, Err(e)) => {
            return Err(ApiError::Validation(format!("invalid JSON: {e}")));
        }
    };

    Ok(Json(response))
}
