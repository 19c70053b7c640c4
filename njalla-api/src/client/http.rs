//! Njalla JSON-RPC request method

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{NjallaError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ErrorMapper, RawApiError};

use super::{NJALLA_REFERER, NjallaClient};

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    method: &'a str,
    params: &'a P,
}

#[derive(Deserialize)]
struct RpcError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

impl NjallaClient {
    /// Executes a JSON-RPC call and deserializes its `result`.
    ///
    /// Calls that answer without a result (`remove-record`, `edit-record`)
    /// see `null`, so `T = ()` and `Option<_>` work for them.
    pub(crate) async fn call<T, P>(&self, method: &str, params: &P, ctx: ErrorContext) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let body = serde_json::to_vec(&RpcRequest { method, params }).map_err(|e| {
            NjallaError::SerializationError {
                detail: e.to_string(),
            }
        })?;

        let request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Njalla {}", self.token))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Referer", NJALLA_REFERER)
            .body(body);

        let (status, response_text) =
            HttpUtils::execute_request_with_retry(request, method, self.max_retries).await?;

        // Error bodies may still carry a JSON-RPC envelope
        let envelope = match serde_json::from_str::<RpcResponse>(&response_text) {
            Ok(envelope) => envelope,
            Err(e) if status >= 400 => {
                log::error!("[njalla] {method} failed with HTTP {status}");
                return Err(self.map_error(
                    RawApiError::with_code(i64::from(status), format!("HTTP {status}: {e}")),
                    ctx,
                ));
            }
            Err(e) => return Err(self.parse_error(e)),
        };

        if let Some(err) = envelope.error {
            let raw = match err.code {
                Some(code) => RawApiError::with_code(code, err.message),
                None => RawApiError::new(err.message),
            };
            let mapped = self.map_error(raw, ctx);
            if mapped.is_expected() {
                log::warn!("[njalla] {method}: {mapped}");
            } else {
                log::error!("[njalla] {method}: {mapped}");
            }
            return Err(mapped);
        }

        if status >= 400 {
            return Err(self.unknown_error(RawApiError::with_code(
                i64::from(status),
                format!("HTTP {status} without error details"),
            )));
        }

        let result = envelope.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result).map_err(|e| {
            log::error!("[njalla] {method}: unexpected result shape: {e}");
            self.parse_error(e)
        })
    }
}
