//! Provider entry point
//!
//! [`NjallaProvider`] owns the resource registry and the configured API
//! context. Every host request lands here: configuration values are
//! defaulted and validated against the resource schema before a lifecycle
//! callback runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::config::{ProviderConfig, ProviderContext};
use crate::diagnostics::{Diagnostic, has_errors};
use crate::error::{ProviderError, Result};
use crate::resource_data::ResourceData;
use crate::resources::{Resource, ResourceRegistry};
use crate::schema::Schema;

/// Schemas of the provider block and every resource type.
#[derive(Debug, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<&'static str, Schema>,
}

/// Outcome of planning a change.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PlanResult {
    /// Configuration with defaults applied, carrying over prior computed values.
    pub planned_state: Map<String, Value>,
    /// Computed attributes whose value is only known after apply.
    pub unknown: Vec<String>,
    /// Attributes whose change destroys and recreates the resource.
    pub requires_replace: Vec<String>,
}

pub struct NjallaProvider {
    registry: ResourceRegistry,
    context: RwLock<Option<Arc<ProviderContext>>>,
}

impl NjallaProvider {
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            context: RwLock::new(None),
        }
    }

    /// Provider that is already configured with `context`.
    pub fn with_context(context: ProviderContext) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            context: RwLock::new(Some(Arc::new(context))),
        }
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: ProviderConfig::schema(),
            resources: self
                .registry
                .iter()
                .map(|r| (r.type_name(), r.schema()))
                .collect(),
        }
    }

    /// Configures the API client from the provider block.
    ///
    /// Environment fallbacks are read from the process environment.
    pub async fn configure(&self, config: Map<String, Value>) -> Result<()> {
        self.configure_with_env(config, |key| std::env::var(key).ok())
            .await
    }

    pub async fn configure_with_env(
        &self,
        mut config: Map<String, Value>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        let schema = ProviderConfig::schema();
        schema.apply_defaults(&mut config);
        let diagnostics = schema.validate(&config);
        if has_errors(&diagnostics) {
            return Err(ProviderError::InvalidConfig(diagnostics));
        }

        let parsed: ProviderConfig = serde_json::from_value(Value::Object(config))
            .map_err(|e| ProviderError::InvalidConfig(vec![Diagnostic::error(e.to_string())]))?;
        let settings = parsed.resolve(env)?;
        log::info!(
            "[njalla] provider configured (endpoint {}, max_retries {})",
            settings.api_url,
            settings.max_retries
        );

        let context = ProviderContext::from_settings(settings)?;
        *self.context.write().await = Some(Arc::new(context));
        Ok(())
    }

    async fn context(&self) -> Result<Arc<ProviderContext>> {
        self.context
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }

    fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.registry
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Validates a resource configuration without touching the API.
    pub fn validate_resource_config(
        &self,
        type_name: &str,
        mut config: Map<String, Value>,
    ) -> Result<Vec<Diagnostic>> {
        let schema = self.resource(type_name)?.schema();
        schema.apply_defaults(&mut config);
        Ok(schema.validate(&config))
    }

    /// Computes the planned state and which changes force replacement.
    ///
    /// `prior` is `None` when the resource is about to be created.
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&ResourceData>,
        config: Map<String, Value>,
    ) -> Result<PlanResult> {
        let schema = self.resource(type_name)?.schema();
        let planned_state = validated_config(&schema, config)?;

        let Some(prior) = prior.filter(|p| !p.is_gone()) else {
            return Ok(PlanResult {
                planned_state,
                unknown: schema
                    .read_only_attributes()
                    .map(str::to_string)
                    .collect(),
                requires_replace: Vec::new(),
            });
        };

        let requires_replace = schema.requires_replace(&prior.attributes, &planned_state);
        let mut planned_state = planned_state;
        let mut unknown = Vec::new();
        for name in schema.read_only_attributes() {
            if requires_replace.is_empty() {
                if let Some(value) = prior.get(name) {
                    planned_state.insert(name.to_string(), value.clone());
                }
            } else {
                unknown.push(name.to_string());
            }
        }

        Ok(PlanResult {
            planned_state,
            unknown,
            requires_replace,
        })
    }

    /// Creates the resource described by `config`.
    ///
    /// When the object was created but the follow-up read failed, the error
    /// is [`ProviderError::Incomplete`] and carries the new ID.
    pub async fn create(&self, type_name: &str, config: Map<String, Value>) -> Result<ResourceData> {
        let resource = self.resource(type_name)?;
        let attributes = validated_config(&resource.schema(), config)?;
        let ctx = self.context().await?;

        let mut data = ResourceData::from_config(attributes);
        let result = resource.create(&ctx, &mut data).await;
        log_failure(type_name, "create", result)
            .map_err(|e| ProviderError::with_state(e, data.clone()))?;
        Ok(data)
    }

    pub async fn read(&self, type_name: &str, mut state: ResourceData) -> Result<ResourceData> {
        let resource = self.resource(type_name)?;
        let ctx = self.context().await?;

        log_failure(type_name, "read", resource.read(&ctx, &mut state).await)?;
        Ok(state)
    }

    /// Applies `config` to the existing resource described by `prior`.
    ///
    /// Failures keep the ID, as [`ProviderError::Incomplete`].
    pub async fn update(
        &self,
        type_name: &str,
        prior: ResourceData,
        config: Map<String, Value>,
    ) -> Result<ResourceData> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();
        let mut attributes = validated_config(&schema, config)?;
        let ctx = self.context().await?;

        for name in schema.read_only_attributes() {
            if let Some(value) = prior.get(name) {
                attributes.insert(name.to_string(), value.clone());
            }
        }

        let mut data = ResourceData::new(prior.id, attributes);
        let result = resource.update(&ctx, &mut data).await;
        log_failure(type_name, "update", result)
            .map_err(|e| ProviderError::with_state(e, data.clone()))?;
        Ok(data)
    }

    pub async fn delete(&self, type_name: &str, mut state: ResourceData) -> Result<()> {
        let resource = self.resource(type_name)?;
        let ctx = self.context().await?;

        log_failure(type_name, "delete", resource.delete(&ctx, &mut state).await)
    }

    pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceData> {
        let resource = self.resource(type_name)?;
        let ctx = self.context().await?;

        log_failure(type_name, "import", resource.import(&ctx, id).await)
    }
}

impl Default for NjallaProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn validated_config(schema: &Schema, mut config: Map<String, Value>) -> Result<Map<String, Value>> {
    schema.apply_defaults(&mut config);
    let diagnostics = schema.validate(&config);
    if has_errors(&diagnostics) {
        return Err(ProviderError::InvalidConfig(diagnostics));
    }
    Ok(config)
}

fn log_failure<T>(type_name: &str, operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        if e.is_expected() {
            log::warn!("[njalla] {operation} {type_name} failed: {e}");
        } else {
            log::error!("[njalla] {operation} {type_name} failed: {e}");
        }
    }
    result
}

#[cfg(test)]
#[path = "provider_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests;
