//! Resource state exchanged with the host

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProviderError, Result};

/// ID plus attributes of one resource instance.
///
/// An empty ID means the resource no longer exists remotely and should be
/// dropped from state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Planned data for a resource that does not exist yet.
    pub fn from_config(attributes: Map<String, Value>) -> Self {
        Self::new(String::new(), attributes)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Marks the resource as gone.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ProviderError::attribute(key, "expected a string")),
            None => Err(ProviderError::attribute(key, "attribute is not set")),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            Some(v) => v
                .as_i64()
                .ok_or_else(|| ProviderError::attribute(key, "expected a number")),
            None => Err(ProviderError::attribute(key, "attribute is not set")),
        }
    }

    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let value = self.get_int(key)?;
        u32::try_from(value)
            .map_err(|_| ProviderError::attribute(key, format!("value {value} is out of range")))
    }

    /// Numeric form of the ID, used by record resources.
    pub fn numeric_id(&self) -> Result<u64> {
        self.id
            .parse()
            .map_err(|_| ProviderError::attribute("id", format!("expected a numeric ID, got: {}", self.id)))
    }
}
