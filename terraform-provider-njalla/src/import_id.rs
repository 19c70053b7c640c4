//! Import ID parsing

use crate::error::{ProviderError, Result};

/// Splits a record import ID of the form `domain:id`.
///
/// Only the first `:` separates; the ID part must be numeric.
pub fn parse_import_id(id: &str) -> Result<(String, u64)> {
    let Some((domain, record_id)) = id.split_once(':') else {
        return Err(bad_format(id));
    };
    if domain.is_empty() || record_id.is_empty() {
        return Err(bad_format(id));
    }

    let record_id = record_id.parse::<u64>().map_err(|_| {
        ProviderError::ImportId(format!("expected id to be numeric, got: {record_id}"))
    })?;

    Ok((domain.to_string(), record_id))
}

fn bad_format(id: &str) -> ProviderError {
    ProviderError::ImportId(format!(
        "unexpected format of ID ({id}), expected domain:id"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_domain_and_id() {
        let (domain, id) = parse_import_id("testing.com:1234").unwrap();
        assert_eq!(domain, "testing.com");
        assert_eq!(id, 1234);
    }

    #[test]
    fn missing_id_with_colon() {
        let err = parse_import_id("testing.com:").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected format of ID (testing.com:), expected domain:id"
        );
    }

    #[test]
    fn missing_id_without_colon() {
        assert!(parse_import_id("testing.com").is_err());
    }

    #[test]
    fn missing_domain() {
        assert!(parse_import_id(":1234").is_err());
    }

    #[test]
    fn non_numeric_id() {
        let err = parse_import_id("testing.com:abc").unwrap_err();
        assert_eq!(err.to_string(), "expected id to be numeric, got: abc");
    }

    #[test]
    fn only_first_colon_splits() {
        let err = parse_import_id("testing.com:12:34").unwrap_err();
        assert_eq!(err.to_string(), "expected id to be numeric, got: 12:34");
    }
}
