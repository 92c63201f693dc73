//! Client identity extraction.
//!
//! Derives a string key for rate limiting from the forwarded-IP headers and
//! the user agent. This is a heuristic fingerprint, not an authenticated
//! identity: clients behind the same proxy with identical user agents share
//! one bucket, and that collision is part of the observable behavior.

use axum::http::{header, HeaderMap};

/// Placeholder used when no client address header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the rate-limit key for a request.
///
/// Uses the first address in `x-forwarded-for`, falling back to
/// `x-real-ip`, falling back to [`UNKNOWN_CLIENT`], concatenated with the
/// raw `user-agent` value. Missing or malformed headers never fail the
/// request; they degrade to the placeholder values.
pub fn client_identity(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(UNKNOWN_CLIENT);

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    format!("{ip}:{user_agent}")
}
