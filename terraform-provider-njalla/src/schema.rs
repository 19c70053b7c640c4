//! Resource and provider schemas
//!
//! A [`Schema`] lists the attributes a resource accepts. It applies defaults
//! to a configuration, validates it, and tells the host which attribute
//! changes force a resource to be replaced.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diagnostics::Diagnostic;
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
}

impl AttributeType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int => value.as_i64().is_some(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "number",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

/// One attribute of a schema.
#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    /// Set by the provider rather than the configuration.
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    /// Changing the value destroys and recreates the resource.
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip)]
    pub validator: Option<Validator>,
}

impl Attribute {
    fn new(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            attr_type,
            description,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            validator: None,
        }
    }

    pub fn string(description: &'static str) -> Self {
        Self::new(AttributeType::String, description)
    }

    pub fn int(description: &'static str) -> Self {
        Self::new(AttributeType::Int, description)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Value used when the configuration leaves the attribute unset.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Computed attributes that cannot appear in a configuration.
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Fills unset (missing or `null`) attributes that have a default.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for (name, attr) in &self.attributes {
            let Some(default) = &attr.default else {
                continue;
            };
            if config.get(*name).is_none_or(Value::is_null) {
                config.insert((*name).to_string(), default.clone());
            }
        }
    }

    /// Checks a configuration against the schema.
    ///
    /// Call [`apply_defaults`](Self::apply_defaults) first; an attribute
    /// with a default is never reported missing.
    pub fn validate(&self, config: &Map<String, Value>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for key in config.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                diagnostics.push(
                    Diagnostic::error("Unsupported argument")
                        .with_detail(format!("An argument named \"{key}\" is not expected here."))
                        .with_attribute(key),
                );
            }
        }

        for (name, attr) in &self.attributes {
            let value = config.get(*name).filter(|v| !v.is_null());

            let Some(value) = value else {
                if attr.required && attr.default.is_none() {
                    diagnostics.push(
                        Diagnostic::error("Missing required argument")
                            .with_detail(format!(
                                "The argument \"{name}\" is required, but no definition was found."
                            ))
                            .with_attribute(*name),
                    );
                }
                continue;
            };

            if attr.is_read_only() {
                diagnostics.push(
                    Diagnostic::error("Value for unconfigurable attribute")
                        .with_detail(format!(
                            "Can't configure a value for \"{name}\": its value will be decided automatically."
                        ))
                        .with_attribute(*name),
                );
                continue;
            }

            if !attr.attr_type.matches(value) {
                diagnostics.push(
                    Diagnostic::error("Incorrect attribute value type")
                        .with_detail(format!(
                            "Inappropriate value for attribute \"{name}\": {} required.",
                            attr.attr_type.name()
                        ))
                        .with_attribute(*name),
                );
                continue;
            }

            if let Some(validator) = attr.validator {
                diagnostics.extend(
                    validator
                        .validate(name, value)
                        .into_iter()
                        .map(|msg| Diagnostic::error(msg).with_attribute(*name)),
                );
            }
        }

        diagnostics
    }

    /// `force_new` attributes whose value differs between the two states.
    pub fn requires_replace(
        &self,
        prior: &Map<String, Value>,
        proposed: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.force_new)
            .filter(|(name, _)| prior.get(**name) != proposed.get(**name))
            .map(|(name, _)| (*name).to_string())
            .collect()
    }

    /// Names of attributes only the provider sets.
    pub fn read_only_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.is_read_only())
            .map(|(name, _)| *name)
    }
}
