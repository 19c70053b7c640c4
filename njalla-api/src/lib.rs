//! # njalla-api
//!
//! Async client for the [Njalla](https://njal.la/) JSON-RPC API: domains,
//! DNS records and virtual servers.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for static and cross-compiled builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use njalla_api::{NewRecord, NjallaApi, NjallaClient, RecordType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NjallaClient::builder("your-token".to_string())
//!         .max_retries(3)
//!         .build()?;
//!
//!     let record = client
//!         .add_record(
//!             "example.com",
//!             &NewRecord {
//!                 name: "www".to_string(),
//!                 record_type: RecordType::A,
//!                 content: "192.0.2.1".to_string(),
//!                 ttl: 3600,
//!                 prio: None,
//!             },
//!         )
//!         .await?;
//!     println!("created record {}", record.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, NjallaError>`](NjallaError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! automatically with exponential backoff; the rest surface immediately.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::{NJALLA_API_URL, NjallaClient, NjallaClientBuilder};
pub use error::{NjallaError, Result};
pub use traits::NjallaApi;
pub use types::{
    Domain, NewRecord, NewServer, Record, RecordType, Server, ServerReset, VALID_PRIORITY,
    VALID_TTL,
};

pub use utils::datetime;
pub use utils::log_sanitizer::mask_token;
