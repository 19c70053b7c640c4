use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Constants ============

/// TTL values (seconds) the API accepts for DNS records.
pub const VALID_TTL: &[i64] = &[60, 300, 900, 3600, 10800, 21600, 86400];

/// MX priority values the API accepts.
pub const VALID_PRIORITY: &[i64] = &[0, 1, 5, 10, 20, 30, 40, 50, 60];

// ============ Record Types ============

/// DNS record type as understood by the Njalla API.
///
/// Serialized in upper case (`"AAAA"`, `"NAPTR"`, ...) except `Dynamic`,
/// which Njalla spells in mixed case. Parsing is case-insensitive. Types
/// without a variant (`ANAME`, `Redirect`, ...) are kept verbatim in
/// [`Other`](Self::Other) so a listing never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    Txt,
    A,
    Aaaa,
    Mx,
    Cname,
    Caa,
    Ptr,
    Ns,
    Tlsa,
    Naptr,
    Srv,
    Sshfp,
    Https,
    Svcb,
    Dynamic,
    /// Any type this crate does not model, as sent by the API.
    Other(String),
}

impl RecordType {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Txt => "TXT",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Cname => "CNAME",
            Self::Caa => "CAA",
            Self::Ptr => "PTR",
            Self::Ns => "NS",
            Self::Tlsa => "TLSA",
            Self::Naptr => "NAPTR",
            Self::Srv => "SRV",
            Self::Sshfp => "SSHFP",
            Self::Https => "HTTPS",
            Self::Svcb => "SVCB",
            Self::Dynamic => "Dynamic",
            Self::Other(name) => name,
        }
    }

    /// Whether records of this type carry a `prio` field.
    pub fn has_priority(&self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "TXT" => Self::Txt,
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "MX" => Self::Mx,
            "CNAME" => Self::Cname,
            "CAA" => Self::Caa,
            "PTR" => Self::Ptr,
            "NS" => Self::Ns,
            "TLSA" => Self::Tlsa,
            "NAPTR" => Self::Naptr,
            "SRV" => Self::Srv,
            "SSHFP" => Self::Sshfp,
            "HTTPS" => Self::Https,
            "SVCB" => Self::Svcb,
            "DYNAMIC" => Self::Dynamic,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

// ============ Records ============

/// A DNS record stored at Njalla.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Numeric record ID, unique within the account.
    pub id: u64,
    /// Relative name (`@` for the apex).
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub content: String,
    pub ttl: u32,
    /// Priority, only present for MX/SRV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prio: Option<u32>,
}

/// Fields needed to create a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<u32>,
}

impl NewRecord {
    /// Attaches an ID, producing the full record used for edits.
    pub fn with_id(self, id: u64) -> Record {
        Record {
            id,
            name: self.name,
            record_type: self.record_type,
            content: self.content,
            ttl: self.ttl,
            prio: self.prio,
        }
    }
}

// ============ Domains ============

/// A domain registered in the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    /// Registration status as reported by Njalla (`active`, `inactive`, ...).
    #[serde(default)]
    pub status: String,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

// ============ Servers ============

/// A virtual server.
///
/// Only `id` is guaranteed; `add-server` answers with a partial object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Instance type, e.g. `njalla1`.
    #[serde(rename = "type", default)]
    pub instance_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub ssh_key: String,
    /// Assigned addresses; empty until provisioning completes.
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub reverse_name: Option<String>,
    #[serde(default)]
    pub os_state: Option<String>,
    #[serde(default)]
    pub autorenew: bool,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

impl Server {
    /// First assigned address, if provisioning has finished.
    pub fn public_ip(&self) -> Option<&str> {
        self.ips.first().map(String::as_str)
    }
}

/// Fields needed to order a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewServer {
    pub name: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub os: String,
    pub ssh_key: String,
    pub months: u32,
}

/// Parameters for reinstalling a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerReset {
    pub id: String,
    pub os: String,
    pub ssh_key: String,
    #[serde(rename = "type")]
    pub instance_type: String,
}
