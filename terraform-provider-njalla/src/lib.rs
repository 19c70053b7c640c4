//! Njalla infrastructure provider
//!
//! Manages Njalla virtual servers, domains and DNS records through the
//! Njalla JSON-RPC API. The host drives the provider over a line-delimited
//! JSON protocol on stdio (see [`protocol`] and [`server`]).
//!
//! # Resource types
//!
//! | Type | Import ID |
//! |------|-----------|
//! | `njalla_server` | server ID |
//! | `njalla_domain` | domain name |
//! | `njalla_record_{txt,a,aaaa,mx,cname,caa,ptr,ns,tlsa,naptr}` | `<domain>:<record id>` |
//!
//! # Example
//!
//! ```rust,ignore
//! use terraform_provider_njalla::NjallaProvider;
//! use serde_json::json;
//!
//! let provider = NjallaProvider::new();
//! provider.configure(serde_json::from_value(json!({"api_token": "..."}))?).await?;
//!
//! let state = provider
//!     .create(
//!         "njalla_record_txt",
//!         serde_json::from_value(json!({
//!             "domain": "example.com",
//!             "ttl": 3600,
//!             "content": "hello",
//!         }))?,
//!     )
//!     .await?;
//! println!("created record {}", state.id());
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod import_id;
pub mod protocol;
pub mod provider;
pub mod resource_data;
pub mod resources;
pub mod schema;
pub mod server;
pub mod validation;

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_mocks;

pub use config::{ProviderConfig, ProviderContext};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{ProviderError, Result};
pub use provider::{NjallaProvider, PlanResult, ProviderSchema};
pub use resource_data::ResourceData;
pub use server::{HANDSHAKE, serve};
