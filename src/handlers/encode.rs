//! Base64 encode/decode tool.

use axum::Json;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::http::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Base64Mode {
    Encode,
    Decode,
}

#[derive(Debug, Deserialize)]
pub struct Base64Request {
    pub input: String,
    pub mode: Base64Mode,
    /// Use the URL-safe alphabet (`-` and `_` instead of `+` and `/`).
    #[serde(default)]
    pub url_safe: bool,
}

#[derive(Debug, Serialize)]
pub struct Base64Response {
    pub mode: Base64Mode,
    pub output: String,
}

pub async fn base64(Json(request): Json<Base64Request>) -> Result<Json<Base64Response>, ApiError> {
    let output = match (request.mode, request.url_safe) {
        (Base64Mode::Encode, false) => STANDARD.encode(request.input.as_bytes()),
        (Base64Mode::Encode, true) => URL_SAFE.encode(request.input.as_bytes()),
        (Base64Mode::Decode, url_safe) => {
            let decoded = if url_safe {
                URL_SAFE.decode(request.input.trim())
            } else {
                STANDARD.decode(request.input.trim())
            }
            .map_err(|e| ApiError::Validation(format!("invalid base64: {e}")))?;

            String::from_utf8(decoded)
                .map_err(|_| ApiError::Validation("decoded data is not valid UTF-8".into()))?
        }
    };

    Ok(Json(Base64Response {
        mode: request.mode,
        output,
    }))
}
