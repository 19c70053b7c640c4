use serde::{Deserialize, Serialize};

/// Error type for every Njalla API operation.
///
/// All variants are serializable so they can be forwarded verbatim to a
/// plugin host as structured diagnostics.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError): connectivity issues, 502/503/504
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): HTTP 429
///
/// The built-in HTTP client retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum NjallaError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded.
    RateLimited {
        /// Suggested wait time in seconds, from the `Retry-After` header.
        retry_after: Option<u64>,
        /// Response body, if any.
        raw_message: Option<String>,
    },

    /// The API token is missing, malformed or revoked.
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The token is valid but not allowed to perform the operation.
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The domain does not exist or does not belong to the account.
    DomainNotFound {
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The DNS record does not exist.
    RecordNotFound {
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The virtual server does not exist.
    ServerNotFound {
        /// ID of the server that was not found.
        server_id: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected by the API.
    InvalidParameter {
        /// Name of the offending parameter, or `general`.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// An error the client does not map to a more specific variant.
    Unknown {
        /// Raw JSON-RPC error code or HTTP status, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

impl NjallaError {
    /// Whether the error is caused by user input or missing resources,
    /// used to choose between `warn` and `error` log levels.
    ///
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::DomainNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::ServerNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the error means the addressed object is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DomainNotFound { .. } | Self::RecordNotFound { .. } | Self::ServerNotFound { .. }
        )
    }
}

impl std::fmt::Display for NjallaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "[njalla] Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "[njalla] Request timeout: {detail}"),
            Self::RateLimited { retry_after, .. } => match retry_after {
                Some(secs) => write!(f, "[njalla] Rate limited (retry after {secs}s)"),
                None => write!(f, "[njalla] Rate limited"),
            },
            Self::InvalidCredentials { raw_message } => match raw_message {
                Some(msg) => write!(f, "[njalla] Invalid API token: {msg}"),
                None => write!(f, "[njalla] Invalid API token"),
            },
            Self::PermissionDenied { raw_message } => match raw_message {
                Some(msg) => write!(f, "[njalla] Permission denied: {msg}"),
                None => write!(f, "[njalla] Permission denied"),
            },
            Self::DomainNotFound {
                domain,
                raw_message,
            } => match raw_message {
                Some(msg) => write!(f, "[njalla] Domain '{domain}' not found: {msg}"),
                None => write!(f, "[njalla] Domain '{domain}' not found"),
            },
            Self::RecordNotFound { record_id, .. } => {
                write!(f, "[njalla] Record '{record_id}' not found")
            }
            Self::ServerNotFound { server_id, .. } => {
                write!(f, "[njalla] Server '{server_id}' not found")
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "[njalla] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { detail } => write!(f, "[njalla] Parse error: {detail}"),
            Self::SerializationError { detail } => {
                write!(f, "[njalla] Serialization error: {detail}")
            }
            Self::Unknown {
                raw_code,
                raw_message,
            } => match raw_code {
                Some(code) => write!(f, "[njalla] {raw_message} (code {code})"),
                None => write!(f, "[njalla] {raw_message}"),
            },
        }
    }
}

impl std::error::Error for NjallaError {}

/// Convenience type alias for `Result<T, NjallaError>`.
pub type Result<T> = std::result::Result<T, NjallaError>;
