//! Shared helpers for provider acceptance tests

#![allow(dead_code)]

use std::env;

use njalla_api::{NjallaApi, NjallaClient};
use serde_json::{Map, Value, json};
use terraform_provider_njalla::NjallaProvider;

#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: {} is not set", $var);
                return;
            }
        )+
    };
}

#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(res.is_ok(), "{}: {res:?}", format_args!($($msg)+));
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Prefix of every record name the acceptance tests create.
pub const TEST_PREFIX: &str = "_acc-";

pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("{TEST_PREFIX}{}", &uuid.to_string()[..8])
}

/// Turns a `json!` literal into an attribute map; non-objects become empty.
pub fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub struct AccContext {
    pub provider: NjallaProvider,
    pub domain: String,
}

impl AccContext {
    /// Provider configured from `NJALLA_API_TOKEN` (and `NJALLA_API_URL`).
    pub async fn from_env() -> Option<Self> {
        let domain = env::var("NJALLA_TESTACC_DOMAIN").ok()?;
        let provider = NjallaProvider::new();
        provider.configure(Map::new()).await.ok()?;
        Some(Self { provider, domain })
    }

    pub fn record_config(&self, name: &str, ttl: u32, content: &str) -> Map<String, Value> {
        attrs(json!({
            "domain": self.domain,
            "name": name,
            "ttl": ttl,
            "content": content,
        }))
    }

    /// Removes records left behind by failed runs.
    pub async fn cleanup(&self) {
        let Ok(token) = env::var("NJALLA_API_TOKEN") else {
            return;
        };
        let mut builder = NjallaClient::builder(token);
        if let Ok(url) = env::var("NJALLA_API_URL") {
            builder = builder.endpoint(url);
        }
        let Ok(client) = builder.build() else {
            return;
        };
        if let Ok(records) = client.list_records(&self.domain).await {
            for record in records {
                if record.name.starts_with(TEST_PREFIX) {
                    let _ = client.remove_record(&self.domain, record.id).await;
                }
            }
        }
    }
}
