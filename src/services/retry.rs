//! Retry with exponential backoff for outbound requests.

use std::time::Duration;

use rand::Rng;

use crate::config::schema::ServicesConfig;
use crate::services::ServiceError;

/// How a retryable request is paced.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &ServicesConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Send a request, retrying transport errors and 5xx responses.
///
/// Only for idempotent requests. The builder must be cloneable (no
/// streaming body); everything the service clients send qualifies.
pub async fn send_with_retry(
    builder: reqwest::RequestBuilder,
    policy: RetryPolicy,
) -> Result<reqwest::Response, ServiceError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let this_attempt = builder
            .try_clone()
            .ok_or_else(|| ServiceError::Request("request body is not retryable".into()))?;

        match this_attempt.send().await {
            Ok(response) if response.status().is_server_error() && attempt < policy.max_attempts => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                tracing::debug!(
                    attempt,
                    status = %response.status(),
                    delay = ?delay,
                    "Retrying upstream request"
                );
                tokio::time::sleep(delay).await;
            }
            Ok(response) => return Ok(response),
            Err(e) if attempt < policy.max_attempts => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                tracing::debug!(attempt, error = %e, delay = ?delay, "Retrying after transport error");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(ServiceError::Transport(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let b1 = calculate_backoff(1, 100, 2000);
        assert!(b1.as_millis() >= 100);

        let b2 = calculate_backoff(2, 100, 2000);
        assert!(b2.as_millis() >= 200);

        let max = calculate_backoff(10, 100, 1000);
        assert!(max.as_millis() >= 1000);
        assert!(max.as_millis() <= 1100);
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        assert_eq!(calculate_backoff(0, 100, 2000), Duration::from_millis(0));
    }
}
