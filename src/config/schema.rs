//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the toolbox API server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Request size and timeout limits.
    pub limits: RequestLimitsConfig,

    /// Rate limiting configuration (per endpoint class).
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Third-party service settings.
    pub services: ServicesConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Request size and timeout limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestLimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RequestLimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_secs: 30,
        }
    }
}

/// Rate limiting configuration.
///
/// Each endpoint class gets its own window/max pair. The table is static:
/// it is read once at startup and never adjusted at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// How often the background sweep deletes expired entries, in seconds.
    pub sweep_interval_secs: u64,

    /// Limits for generic tool endpoints.
    #[serde(default = "default_tools_window")]
    pub tools: WindowConfig,

    /// Limits for sensitive form endpoints.
    #[serde(default = "default_forms_window")]
    pub forms: WindowConfig,

    /// Limits for endpoints that call third-party APIs.
    #[serde(default = "default_external_window")]
    pub external: WindowConfig,
}

/// A single fixed-window limit: at most `max_requests` per `window_ms`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window duration in milliseconds.
    pub window_ms: u64,

    /// Maximum admitted requests per window per client.
    pub max_requests: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        default_tools_window()
    }
}

fn default_tools_window() -> WindowConfig {
    WindowConfig {
        window_ms: 60_000,
        max_requests: 20,
    }
}

fn default_forms_window() -> WindowConfig {
    WindowConfig {
        window_ms: 60_000,
        max_requests: 5,
    }
}

fn default_external_window() -> WindowConfig {
    WindowConfig {
        window_ms: 60_000,
        max_requests: 10,
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: 300,
            tools: default_tools_window(),
            forms: default_forms_window(),
            external: default_external_window(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Third-party service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Outbound request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum attempts for retryable outbound requests.
    pub retry_max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub retry_max_delay_ms: u64,

    /// PageSpeed Insights API settings.
    pub pagespeed: PagespeedConfig,

    /// Image CDN API settings.
    pub media: MediaConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
            retry_max_attempts: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
            pagespeed: PagespeedConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

/// PageSpeed Insights API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagespeedConfig {
    /// API base URL. Overridable so tests can point at a local mock.
    pub base_url: String,

    /// Optional API key. Sent as the `key` query parameter when non-empty.
    pub api_key: String,
}

impl Default for PagespeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/pagespeedonline/v5".to_string(),
            api_key: String::new(),
        }
    }
}

/// Image CDN API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    /// API base URL. Overridable so tests can point at a local mock.
    pub base_url: String,

    /// Optional API key. Sent as a Bearer token when non-empty.
    pub api_key: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.media-cdn.example/v1".to_string(),
            api_key: String::new(),
        }
    }
}
