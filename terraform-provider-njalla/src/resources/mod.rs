//! Managed resource types

mod domain;
mod record;
mod server;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use domain::DomainResource;
pub use record::{RecordKind, RecordResource};
pub use server::ServerResource;

use crate::config::ProviderContext;
use crate::error::Result;
use crate::resource_data::ResourceData;
use crate::schema::Schema;

/// Lifecycle callbacks of one resource type.
///
/// `create`, `read` and `update` leave the refreshed state in `data`. `read`
/// clears the ID when the remote object no longer exists.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name as used in configurations, e.g. `njalla_record_a`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    async fn delete(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    /// Builds state for an existing remote object from its import ID.
    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData>;
}

/// Resource types known to the provider, keyed by type name.
pub struct ResourceRegistry {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    /// Registry with every Njalla resource type.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(ServerResource));
        registry.register(Arc::new(DomainResource));
        for kind in RecordKind::ALL {
            registry.register(Arc::new(RecordResource::new(kind)));
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(type_name).cloned()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Resource>> {
        self.resources.values()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_every_type() {
        let names: Vec<_> = ResourceRegistry::new().type_names().collect();
        assert_eq!(
            names,
            vec![
                "njalla_domain",
                "njalla_record_a",
                "njalla_record_aaaa",
                "njalla_record_caa",
                "njalla_record_cname",
                "njalla_record_mx",
                "njalla_record_naptr",
                "njalla_record_ns",
                "njalla_record_ptr",
                "njalla_record_tlsa",
                "njalla_record_txt",
                "njalla_server",
            ]
        );
    }

    #[test]
    fn lookup_by_name() {
        let registry = ResourceRegistry::new();
        assert!(registry.get("njalla_record_mx").is_some());
        assert!(registry.get("njalla_record_srv").is_none());
    }
}
