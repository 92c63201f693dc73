//! Third-party service clients.
//!
//! # Data Flow
//! ```text
//! handler (validated input)
//!     → client (pagespeed.rs / media.rs)
//!     → retry.rs (backoff for retryable requests)
//!     → remote API over the shared reqwest client
//!     → typed summary back to the handler
//! ```
//!
//! # Design Decisions
//! - One shared HTTP client with connect/request timeouts from config
//! - Idempotent GETs retry on transport errors and 5xx; POSTs never retry
//! - Base URLs come from config so tests can point at a local mock

pub mod media;
pub mod pagespeed;
pub mod retry;

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::ServicesConfig;

/// Error type for outbound service calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("unexpected upstream payload: {0}")]
    Decode(String),

    #[error("request could not be constructed: {0}")]
    Request(String),
}

/// Build the shared outbound HTTP client from config.
pub fn build_http_client(config: &ServicesConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("failed to construct outbound HTTP client")
}
