//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! All errors are collected and returned together, not just the first one,
//! so a broken config file can be fixed in one pass.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{AppConfig, WindowConfig};

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `rate_limit.tools.window_ms`.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
///
/// Pure function: returns every violation found, or `Ok(())`.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a valid socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than zero"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::new("limits.request_timeout_secs", "must be greater than zero"));
    }

    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("rate_limit.sweep_interval_secs", "must be greater than zero"));
    }
    validate_window("rate_limit.tools", &config.rate_limit.tools, &mut errors);
    validate_window("rate_limit.forms", &config.rate_limit.forms, &mut errors);
    validate_window("rate_limit.external", &config.rate_limit.external, &mut errors);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a valid socket address: {:?}", config.observability.metrics_address),
        ));
    }

    if config.services.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("services.connect_timeout_secs", "must be greater than zero"));
    }
    if config.services.request_timeout_secs == 0 {
        errors.push(ValidationError::new("services.request_timeout_secs", "must be greater than zero"));
    }
    if config.services.retry_max_attempts == 0 {
        errors.push(ValidationError::new("services.retry_max_attempts", "must be at least 1"));
    }
    validate_base_url("services.pagespeed.base_url", &config.services.pagespeed.base_url, &mut errors);
    validate_base_url("services.media.base_url", &config.services.media.base_url, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_window(field: &str, window: &WindowConfig, errors: &mut Vec<ValidationError>) {
    if window.window_ms == 0 {
        errors.push(ValidationError::new(format!("{field}.window_ms"), "must be greater than zero"));
    }
    if window.max_requests == 0 {
        errors.push(ValidationError::new(format!("{field}.max_requests"), "must be at least 1"));
    }
}

fn validate_base_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => {
            errors.push(ValidationError::new(
                field,
                format!("unsupported scheme {:?}, expected http or https", url.scheme()),
            ));
        }
        Err(e) => {
            errors.push(ValidationError::new(field, format!("not a valid URL: {e}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.rate_limit.tools.max_requests = 0;
        config.rate_limit.forms.window_ms = 0;
        config.services.pagespeed.base_url = "ftp://example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"rate_limit.tools.max_requests"));
        assert!(fields.contains(&"rate_limit.forms.window_ms"));
        assert!(fields.contains(&"services.pagespeed.base_url"));
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let mut config = AppConfig::default();
        config.rate_limit.sweep_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rate_limit.sweep_interval_secs");
    }
}
