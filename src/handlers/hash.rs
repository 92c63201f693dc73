//! SHA-2 digest tool.

use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::http::ApiError;

const MAX_INPUT_BYTES: usize = 512 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Debug, Deserialize)]
pub struct HashRequest {
    pub text: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

#[derive(Debug, Serialize)]
pub struct HashResponse {
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub digest: String,
}

pub async fn digest(Json(request): Json<HashRequest>) -> Result<Json<HashResponse>, ApiError> {
    if request.text.len() > MAX_INPUT_BYTES {
        return Err(ApiError::Validation(format!(
            "text exceeds {MAX_INPUT_BYTES} bytes"
        )));
    }

    let bytes = request.text.as_bytes();
    let digest = match request.algorithm {
        HashAlgorithm::Sha224 => format!("{:x}", Sha224::digest(bytes)),
        HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        HashAlgorithm::Sha384 => format!("{:x}", Sha384::digest(bytes)),
        HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(bytes)),
    };

    Ok(Json(HashResponse {
        algorithm: request.algorithm,
        digest,
    }))
}
