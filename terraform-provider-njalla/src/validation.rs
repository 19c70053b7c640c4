//! Attribute validators
//!
//! Every check returns the list of problems found; an empty list means the
//! value is accepted. Type mismatches are reported by the schema before a
//! validator runs, so validators silently accept values of the wrong type.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

// ASCII classes; `\d` and `\s` are Unicode-aware in `regex`
static CAA_CONTENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}[\t\n\f\r ]+(?:issue|iodef|issuewild)[\t\n\f\r ]+.+$").ok()
});
static CAA_FLAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,3})[\t\n\f\r ]+").ok());

const TLSA_RFC: &str = "Check RFC 6698 sections 2 and 7";
const NAPTR_RFC: &str = "Check RFC 2915 section 2";

/// Value check attached to a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Integer must be one of the listed values.
    IntInSlice(&'static [i64]),
    Ipv4Address,
    Ipv6Address,
    /// RFC 8659 section 4 presentation format.
    CaaContent,
    /// RFC 6698 sections 2 and 7.
    TlsaContent,
    /// RFC 2915 section 2.
    NaptrContent,
}

impl Validator {
    pub fn validate(self, key: &str, value: &Value) -> Vec<String> {
        match self {
            Self::IntInSlice(valid) => value
                .as_i64()
                .and_then(|v| int_in_slice(key, v, valid).err())
                .into_iter()
                .collect(),
            Self::Ipv4Address => value
                .as_str()
                .and_then(|v| ipv4_address(key, v).err())
                .into_iter()
                .collect(),
            Self::Ipv6Address => value
                .as_str()
                .and_then(|v| ipv6_address(key, v).err())
                .into_iter()
                .collect(),
            Self::CaaContent => value
                .as_str()
                .map(|v| caa_content(key, v))
                .unwrap_or_default(),
            Self::TlsaContent => value
                .as_str()
                .and_then(|v| tlsa_content(v).err())
                .into_iter()
                .collect(),
            Self::NaptrContent => value
                .as_str()
                .and_then(|v| naptr_content(v).err())
                .into_iter()
                .collect(),
        }
    }
}

pub fn int_in_slice(key: &str, value: i64, valid: &[i64]) -> Result<(), String> {
    if valid.contains(&value) {
        return Ok(());
    }
    let list = valid
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    Err(format!("expected {key} to be one of [{list}], got {value}"))
}

pub fn ipv4_address(key: &str, value: &str) -> Result<(), String> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| format!("expected {key} to contain a valid IPv4 address, got: {value}"))
}

pub fn ipv6_address(key: &str, value: &str) -> Result<(), String> {
    value
        .parse::<Ipv6Addr>()
        .map(|_| ())
        .map_err(|_| format!("expected {key} to contain a valid IPv6 address, got: {value}"))
}

/// CAA content: `<flag> <tag> <value>` with `flag` in 0..=255 and `tag` one
/// of `issue`, `issuewild`, `iodef`. Both checks run and report separately.
pub fn caa_content(key: &str, value: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if !CAA_CONTENT.as_ref().is_some_and(|re| re.is_match(value)) {
        errors.push(format!(
            "invalid value for {key} (value must follow RFC 8659: point 4 for syntax)"
        ));
    }

    match CAA_FLAG
        .as_ref()
        .and_then(|re| re.captures(value))
        .and_then(|c| c.get(1))
    {
        None => errors.push("no flag found: RFC 8659 point 4.1.1".to_string()),
        Some(flag) => match flag.as_str().parse::<u16>() {
            Err(_) => errors.push("flag is not int: RFC 8659 point 4.1.1".to_string()),
            Ok(flag) if flag > 255 => {
                errors.push("flag must be between 0 and 255: RFC 8659 4.1.1".to_string());
            }
            Ok(_) => {}
        },
    }

    errors
}

/// TLSA content: `<usage> <selector> <matching type> <data>`, fields split on
/// single spaces. The first failing field is reported.
pub fn tlsa_content(value: &str) -> Result<(), String> {
    let fields: Vec<&str> = value.split(' ').collect();
    if fields.len() != 4 {
        return Err(format!(
            "expected 4 arguments, got: {}. {TLSA_RFC}",
            fields.len()
        ));
    }

    for (name, field) in ["Certificate Usage", "Selector", "Matching Type"]
        .into_iter()
        .zip(&fields)
    {
        let n: i64 = field.parse().map_err(|_| {
            format!("expected {name} field to be int, got: {field}. {TLSA_RFC}")
        })?;
        if !(0..=255).contains(&n) {
            return Err(format!(
                "expected {name} field to be between 0 and 255 (inclusive), got: {n}. {TLSA_RFC}"
            ));
        }
    }

    Ok(())
}

/// NAPTR content: `<order> <preference> <flags> <service> <regexp>
/// <replacement>`. Only the two numeric fields are checked.
pub fn naptr_content(value: &str) -> Result<(), String> {
    let fields: Vec<&str> = value.split(' ').collect();
    if fields.len() < 6 {
        return Err(format!(
            "expected 6+ arguments, got: {}. {NAPTR_RFC}",
            fields.len()
        ));
    }

    for (name, field) in ["Order", "Preference"].into_iter().zip(&fields) {
        if field.parse::<i64>().is_err() {
            return Err(format!(
                "expected {name} field to be int, got: {field}. {NAPTR_RFC}"
            ));
        }
    }

    Ok(())
}
