//! Provider configuration
//!
//! The provider block is decoded from JSON; unset values fall back to the
//! environment and then to built-in defaults.

use std::sync::Arc;
use std::time::Duration;

use njalla_api::{NJALLA_API_URL, NjallaApi, NjallaClient, mask_token};
use serde::Deserialize;

use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::schema::{Attribute, Schema};

pub const API_TOKEN_ENV: &str = "NJALLA_API_TOKEN";
pub const API_URL_ENV: &str = "NJALLA_API_URL";

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_SERVER_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_SERVER_READY_TIMEOUT_SECS: u64 = 600;

/// Provider block as written by the user.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_token: Option<String>,
    pub api_url: Option<String>,
    pub max_retries: Option<u32>,
    /// Seconds between polls while a new server waits for its IP.
    pub server_poll_interval: Option<u64>,
    /// Seconds to wait for a new server's IP before failing.
    pub server_ready_timeout: Option<u64>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &self.api_token.as_deref().map(mask_token))
            .field("api_url", &self.api_url)
            .field("max_retries", &self.max_retries)
            .field("server_poll_interval", &self.server_poll_interval)
            .field("server_ready_timeout", &self.server_ready_timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn schema() -> Schema {
        Schema::new()
            .attribute(
                "api_token",
                Attribute::string("Njalla API token. Falls back to NJALLA_API_TOKEN.")
                    .optional()
                    .sensitive(),
            )
            .attribute(
                "api_url",
                Attribute::string("Njalla API endpoint. Falls back to NJALLA_API_URL.").optional(),
            )
            .attribute(
                "max_retries",
                Attribute::int("Retries for transient API failures.")
                    .optional()
                    .default_value(DEFAULT_MAX_RETRIES),
            )
            .attribute(
                "server_poll_interval",
                Attribute::int("Seconds between polls while a server waits for its IP address.")
                    .optional()
                    .default_value(DEFAULT_SERVER_POLL_INTERVAL_SECS),
            )
            .attribute(
                "server_ready_timeout",
                Attribute::int("Seconds to wait for a server to receive an IP address.")
                    .optional()
                    .default_value(DEFAULT_SERVER_READY_TIMEOUT_SECS),
            )
    }

    /// Applies environment fallbacks and defaults.
    ///
    /// `env` looks up a variable; production passes `std::env::var(..).ok()`.
    pub fn resolve(self, env: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let api_token = self
            .api_token
            .filter(|t| !t.is_empty())
            .or_else(|| env(API_TOKEN_ENV).filter(|t| !t.is_empty()))
            .ok_or(ProviderError::MissingToken)?;

        let api_url = self
            .api_url
            .filter(|u| !u.is_empty())
            .or_else(|| env(API_URL_ENV).filter(|u| !u.is_empty()))
            .unwrap_or_else(|| NJALLA_API_URL.to_string());

        let poll_secs = self
            .server_poll_interval
            .unwrap_or(DEFAULT_SERVER_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(ProviderError::InvalidConfig(vec![
                Diagnostic::error("server_poll_interval must be at least 1 second")
                    .with_attribute("server_poll_interval"),
            ]));
        }

        Ok(Settings {
            api_token,
            api_url,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            server_poll_interval: Duration::from_secs(poll_secs),
            server_ready_timeout: Duration::from_secs(
                self.server_ready_timeout
                    .unwrap_or(DEFAULT_SERVER_READY_TIMEOUT_SECS),
            ),
        })
    }
}

/// Fully resolved provider settings.
pub struct Settings {
    pub api_token: String,
    pub api_url: String,
    pub max_retries: u32,
    pub server_poll_interval: Duration,
    pub server_ready_timeout: Duration,
}

/// Everything a resource callback needs: the API and server polling limits.
#[derive(Clone)]
pub struct ProviderContext {
    pub api: Arc<dyn NjallaApi>,
    pub server_poll_interval: Duration,
    pub server_ready_timeout: Duration,
}

impl ProviderContext {
    pub fn new(api: Arc<dyn NjallaApi>) -> Self {
        Self {
            api,
            server_poll_interval: Duration::from_secs(DEFAULT_SERVER_POLL_INTERVAL_SECS),
            server_ready_timeout: Duration::from_secs(DEFAULT_SERVER_READY_TIMEOUT_SECS),
        }
    }

    /// Builds the HTTP client from resolved settings.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = NjallaClient::builder(settings.api_token)
            .endpoint(settings.api_url)
            .max_retries(settings.max_retries)
            .build()?;

        Ok(Self {
            api: Arc::new(client),
            server_poll_interval: settings.server_poll_interval,
            server_ready_timeout: settings.server_ready_timeout,
        })
    }

    #[must_use]
    pub fn with_server_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.server_poll_interval = interval;
        self.server_ready_timeout = timeout;
        self
    }
}
