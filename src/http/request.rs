//! Request ID generation.
//!
//! Every request gets a UUID v4 `x-request-id` as early as possible so log
//! lines and upstream calls can be correlated. Wired into the router via
//! `tower-http`'s set/propagate request-id layers.

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Generates a fresh UUID v4 request ID for each incoming request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_generates_parseable_uuid() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let mut make = MakeRequestUuid;
        let id = make.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
