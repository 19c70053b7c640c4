//! Provider error type

use njalla_api::NjallaError;
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::resource_data::ResourceData;

/// Errors raised while serving a provider request.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error returned by the Njalla API
    #[error("{0}")]
    Api(#[from] NjallaError),

    /// API error with the operation that triggered it
    #[error("{context}: {source}")]
    ApiContext {
        context: String,
        #[source]
        source: NjallaError,
    },

    /// No token in the provider block nor in the environment
    #[error("Missing required API token for provider Njalla")]
    MissingToken,

    /// A resource operation arrived before `configure`
    #[error("provider not configured")]
    NotConfigured,

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Configuration failed schema validation
    #[error("{}", join_diagnostics(.0))]
    InvalidConfig(Vec<Diagnostic>),

    /// An attribute is missing or has the wrong type
    #[error("{attribute}: {detail}")]
    Attribute { attribute: String, detail: String },

    /// Malformed import ID
    #[error("{0}")]
    ImportId(String),

    /// The object to import does not exist
    #[error("{0}")]
    NotFound(String),

    /// Import ID points at a record of another type
    #[error("record {record_id} in domain {domain} is a {actual} record, expected {expected}")]
    RecordTypeMismatch {
        record_id: u64,
        domain: String,
        actual: String,
        expected: String,
    },

    #[error("server {server_id} did not receive an IP address within {timeout_secs}s")]
    ServerNotReady { server_id: String, timeout_secs: u64 },

    /// Request line could not be decoded
    #[error("invalid request: {0}")]
    Protocol(String),

    /// The remote object exists but a later step failed; `state` must be
    /// kept by the host so the object can still be refreshed or destroyed.
    #[error("{source}")]
    Incomplete {
        state: Box<ResourceData>,
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    pub fn api_context(context: impl Into<String>, source: NjallaError) -> Self {
        Self::ApiContext {
            context: context.into(),
            source,
        }
    }

    pub fn attribute(attribute: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Attribute {
            attribute: attribute.into(),
            detail: detail.into(),
        }
    }

    /// Attaches the state of an already created object to `error`.
    ///
    /// Returns `error` unchanged when `state` has no ID.
    pub fn with_state(error: Self, state: ResourceData) -> Self {
        if state.is_gone() {
            return error;
        }
        Self::Incomplete {
            state: Box::new(state),
            source: Box::new(error),
        }
    }

    /// State carried by an [`Incomplete`](Self::Incomplete) error.
    pub fn partial_state(&self) -> Option<&ResourceData> {
        match self {
            Self::Incomplete { state, .. } => Some(&**state),
            _ => None,
        }
    }

    /// Whether the error is caused by user input rather than a fault.
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Incomplete { source, .. } => source.is_expected(),
            Self::Api(e) | Self::ApiContext { source: e, .. } => e.is_expected(),
            Self::ServerNotReady { .. } | Self::Protocol(_) => false,
            _ => true,
        }
    }

    /// Converts the error into host diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::InvalidConfig(diagnostics) => diagnostics,
            Self::Incomplete { source, .. } => source.into_diagnostics(),
            Self::MissingToken => vec![
                Diagnostic::error("Unable to setup Njalla provider")
                    .with_detail(Self::MissingToken.to_string()),
            ],
            Self::Attribute { attribute, detail } => {
                vec![Diagnostic::error(detail).with_attribute(attribute)]
            }
            other => vec![Diagnostic::error(other.to_string())],
        }
    }
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ProviderError>;
