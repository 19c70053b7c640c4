//! Njalla HTTP client

mod api;
mod error;
mod http;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::create_http_client;
use crate::utils::log_sanitizer::mask_token;

/// Default JSON-RPC endpoint.
pub const NJALLA_API_URL: &str = "https://njal.la/api/1/";
pub(crate) const NJALLA_REFERER: &str = "https://njal.la/";
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Njalla API client.
///
/// Authenticates with an API token created in the Njalla web UI.
///
/// ```rust,no_run
/// use njalla_api::{NjallaApi, NjallaClient};
///
/// # async fn example() -> njalla_api::Result<()> {
/// let client = NjallaClient::new("your-api-token".to_string())?;
/// for domain in client.list_domains().await? {
///     println!("{}", domain.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct NjallaClient {
    pub(crate) client: Client,
    pub(crate) token: String,
    pub(crate) endpoint: String,
    pub(crate) max_retries: u32,
}

impl std::fmt::Debug for NjallaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NjallaClient")
            .field("token", &mask_token(&self.token))
            .field("endpoint", &self.endpoint)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Builder for [`NjallaClient`].
pub struct NjallaClientBuilder {
    token: String,
    endpoint: String,
    max_retries: u32,
}

impl NjallaClientBuilder {
    fn new(token: String) -> Self {
        Self {
            token,
            endpoint: NJALLA_API_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Overrides the API endpoint (default: [`NJALLA_API_URL`]).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn build(self) -> Result<NjallaClient> {
        Ok(NjallaClient {
            client: create_http_client()?,
            token: self.token,
            endpoint: self.endpoint,
            max_retries: self.max_retries,
        })
    }
}

impl NjallaClient {
    /// Creates a client with default settings.
    pub fn new(token: String) -> Result<Self> {
        Self::builder(token).build()
    }

    pub fn builder(token: String) -> NjallaClientBuilder {
        NjallaClientBuilder::new(token)
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
