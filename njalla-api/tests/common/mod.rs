//! Shared helpers for live API tests

#![allow(dead_code)]

use std::env;

use njalla_api::{NewRecord, NjallaApi, NjallaClient, Record, RecordType};

/// Returns early when a required environment variable is missing.
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

/// Asserts `Some` and unwraps it.
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

/// Asserts `Ok` and unwraps it.
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

/// Unique record name so parallel runs don't collide.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

pub struct TestContext {
    pub client: NjallaClient,
    pub domain: String,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let token = env::var("NJALLA_API_TOKEN").ok()?;
        let domain = env::var("NJALLA_TESTACC_DOMAIN").ok()?;
        let mut builder = NjallaClient::builder(token);
        if let Ok(url) = env::var("NJALLA_API_URL") {
            builder = builder.endpoint(url);
        }
        Some(Self {
            client: builder.build().ok()?,
            domain,
        })
    }

    pub async fn create_txt_record(&self, content: &str) -> Option<Record> {
        let record = NewRecord {
            name: generate_test_record_name(),
            record_type: RecordType::Txt,
            content: content.to_string(),
            ttl: 3600,
            prio: None,
        };
        self.client.add_record(&self.domain, &record).await.ok()
    }

    /// Removes every record whose name starts with `_test-`.
    pub async fn cleanup_all_test_records(&self) {
        if let Ok(records) = self.client.list_records(&self.domain).await {
            for record in records {
                if record.name.starts_with("_test-") {
                    let _ = self.client.remove_record(&self.domain, record.id).await;
                }
            }
        }
    }
}
