//! HTTP plumbing shared by every API call
//!
//! Sending, status classification, logging and retrying live here so the
//! JSON-RPC layer in `client::http` only deals with envelopes.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::NjallaError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Whole-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound for a server-provided `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Upper bound for exponential backoff.
const MAX_BACKOFF_MS: u64 = 10_000;

/// Creates the HTTP client used for all API calls.
pub fn create_http_client() -> Result<Client, NjallaError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("njalla-api/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| NjallaError::NetworkError {
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Sends a request and returns `(status, body)`.
    ///
    /// HTTP 429 becomes [`NjallaError::RateLimited`] and 502/503/504 become
    /// [`NjallaError::NetworkError`]; every other status is handed back to
    /// the caller together with the body.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method: &str,
    ) -> Result<(u16, String), NjallaError> {
        log::debug!("[njalla] POST {method}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                NjallaError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                NjallaError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[njalla] {method} -> HTTP {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[njalla] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(NjallaError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[njalla] Server error (HTTP {status_code})");
            return Err(NjallaError::NetworkError {
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| NjallaError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[njalla] {method} response body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parses a JSON document, logging a truncated copy of the input on failure.
    pub fn parse_json<T>(response_text: &str) -> Result<T, NjallaError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[njalla] JSON parse failed: {e}");
            log::error!("[njalla] Raw response: {}", truncate_for_log(response_text));
            NjallaError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// Like [`execute_request`](Self::execute_request), retrying transient
    /// failures up to `max_retries` times.
    ///
    /// # Retry strategy
    /// - Only `NetworkError`, `Timeout` and `RateLimited` are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (capped at 10s)
    /// - `Retry-After` is honoured when present (capped at 30s)
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method: &str,
        max_retries: u32,
    ) -> Result<(u16, String), NjallaError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[njalla] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, method).await;
            };

            match Self::execute_request(req, method).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[njalla] {method} failed (attempt {}/{}), retrying in {:.1}s: {e}",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| NjallaError::NetworkError {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

fn is_retryable(error: &NjallaError) -> bool {
    matches!(
        error,
        NjallaError::NetworkError { .. }
            | NjallaError::Timeout { .. }
            | NjallaError::RateLimited { .. }
    )
}

fn retry_delay(error: &NjallaError, attempt: u32) -> Duration {
    if let NjallaError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    // 2^20 already exceeds the cap
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
