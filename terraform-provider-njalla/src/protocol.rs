//! Wire messages between the plugin host and the provider
//!
//! One JSON object per line. A request carries an `id` echoed back in the
//! response and a `method` selecting the operation:
//!
//! ```text
//! {"id":1,"method":"configure","config":{"api_token":"..."}}
//! {"id":1,"result":{}}
//! {"id":2,"method":"read","type_name":"njalla_record_a","state":{"id":"7","attributes":{...}}}
//! {"id":2,"diagnostics":[{"severity":"error","summary":"..."}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::diagnostics::{Diagnostic, has_errors};
use crate::error::{ProviderError, Result};
use crate::provider::NjallaProvider;
use crate::resource_data::ResourceData;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    GetSchema,
    Configure {
        #[serde(default)]
        config: Map<String, Value>,
    },
    ValidateResourceConfig {
        type_name: String,
        #[serde(default)]
        config: Map<String, Value>,
    },
    Plan {
        type_name: String,
        #[serde(default)]
        prior_state: Option<ResourceData>,
        #[serde(default)]
        config: Map<String, Value>,
    },
    Create {
        type_name: String,
        #[serde(default)]
        config: Map<String, Value>,
    },
    Read {
        type_name: String,
        state: ResourceData,
    },
    Update {
        type_name: String,
        prior_state: ResourceData,
        #[serde(default)]
        config: Map<String, Value>,
    },
    Delete {
        type_name: String,
        state: ResourceData,
    },
    Import {
        type_name: String,
        /// `id` is taken by the request envelope.
        import_id: String,
    },
    Stop,
}

/// Splits a request line into its `id` and the decoded request.
///
/// The `id` is recovered whenever the line is a JSON object, so a request
/// with an unknown method still gets a correlated error response.
pub fn parse_request(line: &str) -> (Value, Result<Request>) {
    let mut object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            return (
                Value::Null,
                Err(ProviderError::Protocol("expected a JSON object".to_string())),
            );
        }
        Err(e) => return (Value::Null, Err(ProviderError::Protocol(e.to_string()))),
    };

    let id = object.remove("id").unwrap_or(Value::Null);
    let request = serde_json::from_value(Value::Object(object))
        .map_err(|e| ProviderError::Protocol(e.to_string()));
    (id, request)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            diagnostics: Vec::new(),
        }
    }

    /// Error response. An [`ProviderError::Incomplete`] error keeps its
    /// state as the result next to the diagnostics.
    pub fn failure(id: Value, error: ProviderError) -> Self {
        let result = error
            .partial_state()
            .and_then(|state| serde_json::to_value(state).ok());
        Self {
            id,
            result,
            diagnostics: error.into_diagnostics(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn is_error(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ProviderError::Protocol(e.to_string()))
}

/// Runs one request against the provider.
pub async fn dispatch(provider: &NjallaProvider, id: Value, request: Request) -> Response {
    match dispatch_inner(provider, request).await {
        Ok((result, diagnostics)) => Response::success(id, result).with_diagnostics(diagnostics),
        Err(e) => Response::failure(id, e),
    }
}

async fn dispatch_inner(
    provider: &NjallaProvider,
    request: Request,
) -> Result<(Value, Vec<Diagnostic>)> {
    let result = match request {
        Request::GetSchema => to_value(&provider.schema())?,
        Request::Configure { config } => {
            provider.configure(config).await?;
            json!({})
        }
        Request::ValidateResourceConfig { type_name, config } => {
            let diagnostics = provider.validate_resource_config(&type_name, config)?;
            let valid = !has_errors(&diagnostics);
            return Ok((json!({ "valid": valid }), diagnostics));
        }
        Request::Plan {
            type_name,
            prior_state,
            config,
        } => to_value(&provider.plan(&type_name, prior_state.as_ref(), config)?)?,
        Request::Create { type_name, config } => {
            to_value(&provider.create(&type_name, config).await?)?
        }
        Request::Read { type_name, state } => to_value(&provider.read(&type_name, state).await?)?,
        Request::Update {
            type_name,
            prior_state,
            config,
        } => to_value(&provider.update(&type_name, prior_state, config).await?)?,
        Request::Delete { type_name, state } => {
            provider.delete(&type_name, state).await?;
            json!({})
        }
        Request::Import {
            type_name,
            import_id,
        } => to_value(&provider.import(&type_name, &import_id).await?)?,
        Request::Stop => json!({}),
    };
    Ok((result, Vec::new()))
}
