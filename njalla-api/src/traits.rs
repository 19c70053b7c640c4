use async_trait::async_trait;

use crate::error::{NjallaError, Result};
use crate::types::{Domain, NewRecord, NewServer, Record, Server, ServerReset};

/// Raw JSON-RPC error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// JSON-RPC error code, or HTTP status when the body had no envelope
    pub code: Option<i64>,
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

/// What a call was addressing, used to pick the right not-found variant (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    pub domain: Option<String>,
    pub record_id: Option<String>,
    pub server_id: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn record(domain: &str, record_id: u64) -> Self {
        Self {
            domain: Some(domain.to_string()),
            record_id: Some(record_id.to_string()),
            ..Self::default()
        }
    }

    pub fn server(server_id: &str) -> Self {
        Self {
            server_id: Some(server_id.to_string()),
            ..Self::default()
        }
    }
}

/// Maps raw API errors onto [`NjallaError`] (internal)
pub(crate) trait ErrorMapper {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> NjallaError;

    fn parse_error(&self, detail: impl ToString) -> NjallaError {
        NjallaError::ParseError {
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> NjallaError {
        NjallaError::Unknown {
            raw_code: raw.code.map(|c| c.to_string()),
            raw_message: raw.message,
        }
    }
}

/// Operations offered by the Njalla API.
///
/// [`NjallaClient`](crate::NjallaClient) is the HTTP implementation; the
/// trait exists so callers can substitute an in-memory fake in tests.
#[async_trait]
pub trait NjallaApi: Send + Sync {
    /// Lists every domain in the account.
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// Fetches a single domain.
    async fn get_domain(&self, domain: &str) -> Result<Domain>;

    /// Registers a domain for `years` years. Returns the registration task ID.
    async fn register_domain(&self, domain: &str, years: u32) -> Result<String>;

    /// Lists every record of `domain`.
    async fn list_records(&self, domain: &str) -> Result<Vec<Record>>;

    /// Creates a record and returns it with its assigned ID.
    async fn add_record(&self, domain: &str, record: &NewRecord) -> Result<Record>;

    /// Replaces the record identified by `record.id`.
    async fn edit_record(&self, domain: &str, record: &Record) -> Result<()>;

    /// Deletes a record.
    async fn remove_record(&self, domain: &str, record_id: u64) -> Result<()>;

    /// Lists every server in the account.
    async fn list_servers(&self) -> Result<Vec<Server>>;

    /// Orders a server. The returned object always carries the new ID.
    async fn add_server(&self, server: &NewServer) -> Result<Server>;

    /// Reinstalls a server with a new OS, key or instance type.
    async fn reset_server(&self, reset: &ServerReset) -> Result<()>;

    /// Cancels a server.
    async fn remove_server(&self, server_id: &str) -> Result<()>;

    /// Finds a record by ID.
    ///
    /// Default implementation scans [`list_records`](Self::list_records);
    /// the API has no single-record lookup.
    async fn find_record(&self, domain: &str, record_id: u64) -> Result<Option<Record>> {
        let records = self.list_records(domain).await?;
        Ok(records.into_iter().find(|r| r.id == record_id))
    }

    /// Finds a server by ID by scanning [`list_servers`](Self::list_servers).
    async fn find_server(&self, server_id: &str) -> Result<Option<Server>> {
        let servers = self.list_servers().await?;
        Ok(servers.into_iter().find(|s| s.id == server_id))
    }

    /// Finds a domain by name by scanning [`list_domains`](Self::list_domains).
    async fn find_domain(&self, name: &str) -> Result<Option<Domain>> {
        let domains = self.list_domains().await?;
        Ok(domains.into_iter().find(|d| d.name == name))
    }
}
