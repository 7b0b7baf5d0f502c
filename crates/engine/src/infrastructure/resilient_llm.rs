//! Retrying wrapper around any [`LlmPort`].
//!
//! Transient transport failures are retried with exponential backoff and
//! jitter. Authentication and malformed-request failures surface at once.
//! The narration layer above never sees retries, only the final outcome.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse};

/// Backoff schedule for [`ResilientLlmClient`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Upper bound for a single delay
    pub max_delay_ms: u64,
    /// Fraction (0.0-1.0) of the delay used as +/- jitter
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1), capped, jittered.
    fn backoff_delay(&self, attempt: u32) -> u64 {
        let exponential = self
            .config
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range <= 0 {
            return capped;
        }
        let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
        (capped as i64 + jitter).max(0) as u64
    }

    /// Client errors (4xx other than 408 and 429) are permanent. Failures
    /// without a status, such as refused connections, are transient.
    fn is_retryable(error: &LlmError) -> bool {
        match error {
            LlmError::RequestFailed(msg) => match leading_status(msg) {
                Some(408 | 429) => true,
                Some(status) => !(400..500).contains(&status),
                None => true,
            },
            LlmError::InvalidResponse(_) => true,
        }
    }
}

/// HTTP status at the start of a `"<status>: <body>"` failure message.
fn leading_status(msg: &str) -> Option<u16> {
    let msg = msg.trim_start();
    let code = msg.get(..3)?;
    let rest = msg.get(3..)?;
    if !rest.is_empty() && !rest.starts_with([' ', ':']) {
        return None;
    }
    code.parse().ok().filter(|status| (100..600).contains(status))
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 0;
        loop {
            let error = match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "LLM request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if !Self::is_retryable(&error) {
                tracing::error!(error = %error, "LLM request failed with non-retryable error");
                return Err(error);
            }
            if attempt >= self.config.max_retries {
                tracing::error!(
                    attempts = attempt + 1,
                    error = %error,
                    "LLM request failed after all retry attempts"
                );
                return Err(error);
            }

            attempt += 1;
            let delay = self.backoff_delay(attempt);
            tracing::warn!(
                attempt,
                max_retries = self.config.max_retries,
                delay_ms = delay,
                error = %error,
                "LLM request failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times with `error`, then answers.
    struct FlakyLlm {
        failures: AtomicU32,
        calls: AtomicU32,
        error: LlmError,
    }

    impl FlakyLlm {
        fn new(failures: u32, error: LlmError) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
                error,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmPort for FlakyLlm {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                Err(self.error.clone())
            } else {
                Ok(LlmResponse::text("The torches flare."))
            }
        }
    }

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 10,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn first_attempt_success_is_passed_through() {
        let inner = Arc::new(FlakyLlm::new(0, LlmError::RequestFailed("x".into())));
        let client = ResilientLlmClient::new(inner.clone(), fast(3));

        let response = client.generate(LlmRequest::prompt("go")).await.unwrap();

        assert_eq!(response.content, "The torches flare.");
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let inner = Arc::new(FlakyLlm::new(2, LlmError::RequestFailed("connection reset".into())));
        let client = ResilientLlmClient::new(inner.clone(), fast(3));

        assert!(client.generate(LlmRequest::prompt("go")).await.is_ok());
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let inner = Arc::new(FlakyLlm::new(10, LlmError::InvalidResponse("garbled".into())));
        let client = ResilientLlmClient::new(inner.clone(), fast(2));

        assert!(client.generate(LlmRequest::prompt("go")).await.is_err());
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn auth_errors_are_not_retried() {
        let inner = Arc::new(FlakyLlm::new(10, LlmError::RequestFailed("401 Unauthorized".into())));
        let client = ResilientLlmClient::new(inner.clone(), fast(3));

        assert!(client.generate(LlmRequest::prompt("go")).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_mentioning_client_codes_is_retried() {
        let inner = Arc::new(FlakyLlm::new(
            1,
            LlmError::RequestFailed(
                "503 Service Unavailable: Invalid state, upstream returned 400".into(),
            ),
        ));
        let client = ResilientLlmClient::new(inner.clone(), fast(3));

        assert!(client.generate(LlmRequest::prompt("go")).await.is_ok());
        assert_eq!(inner.calls(), 2);
    }

    #[test]
    fn retryability_follows_leading_status() {
        let failed = |msg: &str| LlmError::RequestFailed(msg.to_string());

        assert!(!ResilientLlmClient::is_retryable(&failed("400 Bad Request: bad json")));
        assert!(!ResilientLlmClient::is_retryable(&failed("404 Not Found: model \"x\"")));
        assert!(ResilientLlmClient::is_retryable(&failed("429 Too Many Requests: slow down")));
        assert!(ResilientLlmClient::is_retryable(&failed("500 Internal Server Error: 403")));
        assert!(ResilientLlmClient::is_retryable(&failed(
            "error sending request: Invalid URL 401"
        )));
        assert!(ResilientLlmClient::is_retryable(&LlmError::InvalidResponse(
            "400".into()
        )));
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let inner = Arc::new(FlakyLlm::new(1, LlmError::RequestFailed("timeout".into())));
        let client = ResilientLlmClient::new(inner.clone(), fast(0));

        assert!(client.generate(LlmRequest::prompt("go")).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_factor: 0.0,
        };
        let client = ResilientLlmClient::new(
            Arc::new(FlakyLlm::new(0, LlmError::RequestFailed(String::new()))),
            config,
        );

        let delays: Vec<u64> = (1..=6).map(|a| client.backoff_delay(a)).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000, 30000]);
    }

    #[test]
    fn jitter_stays_within_range() {
        let client = ResilientLlmClient::new(
            Arc::new(FlakyLlm::new(0, LlmError::RequestFailed(String::new()))),
            RetryConfig::default(),
        );
        for _ in 0..50 {
            let delay = client.backoff_delay(1);
            assert!((800..=1200).contains(&delay));
        }
    }
}
