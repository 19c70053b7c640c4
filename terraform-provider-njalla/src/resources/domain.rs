//! `njalla_domain`

use async_trait::async_trait;

use crate::config::ProviderContext;
use crate::error::{ProviderError, Result};
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

use super::Resource;

/// A registered domain. The ID is the domain name.
pub struct DomainResource;

#[async_trait]
impl Resource for DomainResource {
    fn type_name(&self) -> &'static str {
        "njalla_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attribute("name", Attribute::string("Name of the domain").required())
            .attribute(
                "years",
                Attribute::int("Number of years to register the domain for").required(),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("name")?.to_string();
        let years = data.get_u32("years")?;

        let task = ctx.api.register_domain(&name, years).await?;
        log::info!("[njalla] registering {name} for {years} year(s), task {task}");
        data.set_id(name);

        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.api.find_domain(data.id()).await? {
            Some(domain) => data.set("name", domain.name),
            None => {
                log::warn!(
                    "[njalla] domain {} is no longer in the account, removing from state",
                    data.id()
                );
                data.clear_id();
            }
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        // registration length can't be changed through the API
        self.read(ctx, data).await
    }

    async fn delete(&self, _ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        log::warn!(
            "[njalla] domain {} cannot be deleted through the API; removing it from state only",
            data.id()
        );
        data.clear_id();
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let domains = ctx
            .api
            .list_domains()
            .await
            .map_err(|e| ProviderError::api_context("Listing domains failed", e))?;

        let domain = domains
            .into_iter()
            .find(|d| d.name == id)
            .ok_or_else(|| ProviderError::NotFound(format!("Couldn't find domain with id {id}")))?;

        let mut data = ResourceData::default();
        data.set_id(domain.name.as_str());
        data.set("name", domain.name);
        Ok(data)
    }
}
