//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.rate_limit.tools.max_requests, 20);
        assert_eq!(config.rate_limit.forms.max_requests, 5);
        assert_eq!(config.rate_limit.external.max_requests, 10);
        assert_eq!(config.rate_limit.sweep_interval_secs, 300);
    }

    #[test]
    fn test_partial_rate_limit_table_keeps_class_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [rate_limit.tools]
            window_ms = 10000
            max_requests = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.tools.max_requests, 3);
        assert_eq!(config.rate_limit.tools.window_ms, 10_000);
        // Untouched classes keep their own defaults, not the tools default.
        assert_eq!(config.rate_limit.forms.max_requests, 5);
        assert_eq!(config.rate_limit.external.max_requests, 10);
    }
}
