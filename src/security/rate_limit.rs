//! Fixed-window rate limiting keyed by client identity.
//!
//! One counter per client per window. A window is `window` long; once it
//! expires the next check starts a fresh one. This means a client can land
//! up to `2 * max_requests` requests across a window boundary (the tail of
//! one window plus the head of the next). That burst tolerance is the
//! documented trade-off of the fixed-window algorithm over sliding windows
//! or token buckets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::broadcast;

use crate::config::schema::WindowConfig;
use crate::observability::metrics;
use crate::security::identity::client_identity;

/// Per-key window state: how many requests were admitted, and when the
/// window rolls over.
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// The result of an admission check. Always well-formed; `check` has no
/// failure mode other than `allowed == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// The configured per-window maximum.
    pub limit: u32,
    /// Admissions left in the current window.
    pub remaining: u32,
    /// When the current window expires.
    pub reset_at: Instant,
}

impl Decision {
    /// Time until the window rolls over.
    pub fn retry_after(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }

    /// `Retry-After` header value: seconds until reset, rounded up.
    pub fn retry_after_secs(&self) -> u64 {
        let wait = self.retry_after();
        wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
    }

    /// `X-RateLimit-Reset` header value: reset time as a unix timestamp.
    pub fn reset_unix_secs(&self) -> u64 {
        SystemTime::now()
            .checked_add(self.retry_after())
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// In-memory fixed-window rate limiter for one endpoint class.
///
/// Constructed explicitly and shared via `Arc`; never a process-wide
/// singleton. The entry map is guarded by a mutex so check-then-increment
/// is atomic across concurrent request tasks, and the background sweep
/// takes the same lock when deleting expired entries.
///
/// State is process-local and lost on restart. Counters are not shared
/// across instances; a true global limit would need an external store.
pub struct FixedWindowLimiter {
    class: String,
    window: Duration,
    max_requests: u32,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl FixedWindowLimiter {
    pub fn new(class: impl Into<String>, window: Duration, max_requests: u32) -> Self {
        Self {
            class: class.into(),
            window,
            max_requests,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(class: impl Into<String>, config: &WindowConfig) -> Self {
        Self::new(
            class,
            Duration::from_millis(config.window_ms),
            config.max_requests,
        )
    }

    /// Endpoint class label, used for logs and metrics.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Check whether a request from `identity` is admitted, and count it if
    /// so.
    ///
    /// A fresh or expired entry is replaced with `count = 1` and a new
    /// window. A full window denies with the existing reset time, so the
    /// caller can surface it as `Retry-After`.
    pub fn check(&self, identity: &str) -> Decision {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter mutex poisoned");

        match entries.get_mut(identity) {
            Some(entry) if now < entry.reset_at => {
                if entry.count >= self.max_requests {
                    Decision {
                        allowed: false,
                        limit: self.max_requests,
                        remaining: 0,
                        reset_at: entry.reset_at,
                    }
                } else {
                    entry.count += 1;
                    Decision {
                        allowed: true,
                        limit: self.max_requests,
                        remaining: self.max_requests - entry.count,
                        reset_at: entry.reset_at,
                    }
                }
            }
            _ => {
                let reset_at = now + self.window;
                entries.insert(
                    identity.to_string(),
                    WindowEntry { count: 1, reset_at },
                );
                Decision {
                    allowed: true,
                    limit: self.max_requests,
                    remaining: self.max_requests.saturating_sub(1),
                    reset_at,
                }
            }
        }
    }

    /// Delete entries whose window has already expired. Returns how many
    /// were removed. Bounds memory growth under many distinct identities.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter mutex poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        before - entries.len()
    }

    /// Number of identities currently tracked.
    pub fn tracked_identities(&self) -> usize {
        self.entries.lock().expect("rate limiter mutex poisoned").len()
    }
}

/// Middleware enforcing one class limiter on the routes it wraps.
///
/// Denied requests get a 429 with `Retry-After`; every response carries the
/// `X-RateLimit-*` headers mirroring the decision.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let identity = client_identity(request.headers());
    let decision = limiter.check(&identity);

    if decision.allowed {
        let mut response = next.run(request).await;
        apply_rate_limit_headers(response.headers_mut(), &decision);
        response
    } else {
        tracing::warn!(
            class = limiter.class(),
            client = %identity,
            retry_after_secs = decision.retry_after_secs(),
            "Rate limit exceeded"
        );
        metrics::record_rate_limited(limiter.class());

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": "too many requests" })),
        )
            .into_response();
        apply_rate_limit_headers(response.headers_mut(), &decision);
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(decision.retry_after_secs()),
        );
        response
    }
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_unix_secs()));
}

/// Background task that periodically deletes expired entries from every
/// class limiter. Holds a shutdown receiver so it exits with the process.
pub struct Sweeper {
    limiters: Vec<Arc<FixedWindowLimiter>>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(limiters: Vec<Arc<FixedWindowLimiter>>, interval: Duration) -> Self {
        Self { limiters, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            classes = self.limiters.len(),
            "Rate limit sweeper starting"
        );

        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_all();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn sweep_all(&self) {
        for limiter in &self.limiters {
            let removed = limiter.sweep();
            let tracked = limiter.tracked_identities();
            metrics::record_tracked_keys(limiter.class(), tracked);
            if removed > 0 {
                tracing::debug!(
                    class = limiter.class(),
                    removed,
                    tracked,
                    "Swept expired rate limit entries"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn limiter(window_ms: u64, max: u32) -> FixedWindowLimiter {
        FixedWindowLimiter::new("test", Duration::from_millis(window_ms), max)
    }

    #[test]
    fn test_denies_after_max_requests() {
        let limiter = limiter(60_000, 3);
        assert!(limiter.check("a").allowed);
        assert!(limiter.check("a").allowed);
        assert!(limiter.check("a").allowed);
        let fourth = limiter.check("a");
        assert!(!fourth.allowed);
        assert_eq!(fourth.remaining, 0);
    }

    #[test]
    fn test_remaining_decrements_and_never_goes_negative() {
        let limiter = limiter(60_000, 3);
        assert_eq!(limiter.check("a").remaining, 2);
        assert_eq!(limiter.check("a").remaining, 1);
        assert_eq!(limiter.check("a").remaining, 0);
        // Denied calls stay pinned at zero.
        assert_eq!(limiter.check("a").remaining, 0);
        assert_eq!(limiter.check("a").remaining, 0);
    }

    #[test]
    fn test_denied_decision_keeps_first_reset_time() {
        let limiter = limiter(60_000, 3);
        let first = limiter.check("a");
        limiter.check("a");
        limiter.check("a");
        let denied = limiter.check("a");
        assert!(!denied.allowed);
        assert_eq!(denied.reset_at, first.reset_at);
    }

    #[test]
    fn test_identities_are_isolated() {
        let limiter = limiter(60_000, 1);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);
        assert!(limiter.check("b").allowed);
    }

    #[test]
    fn test_window_expiry_starts_fresh() {
        let limiter = limiter(50, 2);
        assert!(limiter.check("a").allowed);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);

        thread::sleep(Duration::from_millis(60));

        let after = limiter.check("a");
        assert!(after.allowed);
        assert_eq!(after.remaining, 1);
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let limiter = limiter(50, 5);
        limiter.check("stale");
        thread::sleep(Duration::from_millis(60));
        limiter.check("fresh");

        assert_eq!(limiter.tracked_identities(), 2);
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_identities(), 1);

        // The swept identity behaves as brand new.
        let again = limiter.check("stale");
        assert!(again.allowed);
        assert_eq!(again.remaining, 4);
    }

    #[test]
    fn test_retry_after_bounded_by_window() {
        let limiter = limiter(60_000, 1);
        limiter.check("a");
        let denied = limiter.check("a");
        assert!(!denied.allowed);
        assert!(denied.retry_after() <= Duration::from_secs(60));
        assert!(denied.retry_after_secs() >= 59);
    }
}
