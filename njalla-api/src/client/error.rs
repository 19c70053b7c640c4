//! Njalla error mapping

use crate::error::NjallaError;
use crate::traits::{ErrorContext, ErrorMapper, RawApiError};

use super::NjallaClient;

impl ErrorMapper for NjallaClient {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> NjallaError {
        match raw.code {
            Some(401) => NjallaError::InvalidCredentials {
                raw_message: Some(raw.message),
            },
            Some(403) => NjallaError::PermissionDenied {
                raw_message: Some(raw.message),
            },
            Some(404) => not_found(raw, context),
            Some(400 | 422) => NjallaError::InvalidParameter {
                param: "general".to_string(),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}

/// The most specific object named in the context is the one that is missing.
fn not_found(raw: RawApiError, context: ErrorContext) -> NjallaError {
    let raw_message = Some(raw.message);
    if let Some(record_id) = context.record_id {
        return NjallaError::RecordNotFound {
            record_id,
            raw_message,
        };
    }
    if let Some(server_id) = context.server_id {
        return NjallaError::ServerNotFound {
            server_id,
            raw_message,
        };
    }
    if let Some(domain) = context.domain {
        return NjallaError::DomainNotFound {
            domain,
            raw_message,
        };
    }
    NjallaError::Unknown {
        raw_code: Some("404".to_string()),
        raw_message: raw_message.unwrap_or_default(),
    }
}
