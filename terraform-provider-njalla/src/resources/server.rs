//! `njalla_server`

use async_trait::async_trait;
use njalla_api::{NewServer, Server, ServerReset};
use tokio::time::Instant;

use crate::config::ProviderContext;
use crate::error::{ProviderError, Result};
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

use super::Resource;

/// A virtual server.
///
/// Freshly ordered servers have no address for a while; `read` polls until
/// one is assigned or the configured timeout elapses.
pub struct ServerResource;

impl ServerResource {
    fn apply_server(data: &mut ResourceData, server: &Server) {
        data.set("instance_type", server.instance_type.as_str());
        data.set("os", server.os.as_str());
        data.set("public_key", server.ssh_key.as_str());
        data.set("public_ip", server.public_ip().unwrap_or_default());
    }
}

#[async_trait]
impl Resource for ServerResource {
    fn type_name(&self) -> &'static str {
        "njalla_server"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attribute("name", Attribute::string("Name for the server").required())
            .attribute(
                "instance_type",
                Attribute::string("Instance type for the server").required(),
            )
            .attribute("os", Attribute::string("OS type for the server").required())
            .attribute(
                "public_key",
                Attribute::string("Public key material for this server").required(),
            )
            .attribute(
                "months",
                Attribute::int("Number of months to buy the server for").required(),
            )
            .attribute(
                "public_ip",
                Attribute::string("Public IPv4 address of this server").computed(),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let request = NewServer {
            name: data.get_str("name")?.to_string(),
            instance_type: data.get_str("instance_type")?.to_string(),
            os: data.get_str("os")?.to_string(),
            ssh_key: data.get_str("public_key")?.to_string(),
            months: data.get_u32("months")?,
        };

        let server = ctx.api.add_server(&request).await?;
        log::info!("[njalla] server {} ordered as {}", request.name, server.id);
        data.set_id(server.id);

        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        let started = Instant::now();

        loop {
            let Some(server) = ctx.api.find_server(&id).await? else {
                log::warn!("[njalla] server {id} no longer exists, removing from state");
                data.clear_id();
                return Ok(());
            };

            if server.public_ip().is_some() {
                Self::apply_server(data, &server);
                return Ok(());
            }

            if started.elapsed() >= ctx.server_ready_timeout {
                return Err(ProviderError::ServerNotReady {
                    server_id: id,
                    timeout_secs: ctx.server_ready_timeout.as_secs(),
                });
            }

            log::info!(
                "[njalla] server {id} has no IP address yet, checking again in {}s",
                ctx.server_poll_interval.as_secs()
            );
            tokio::time::sleep(ctx.server_poll_interval).await;
        }
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let reset = ServerReset {
            id: data.id().to_string(),
            os: data.get_str("os")?.to_string(),
            ssh_key: data.get_str("public_key")?.to_string(),
            instance_type: data.get_str("instance_type")?.to_string(),
        };

        // reset-server reinstalls; skip it when only name or months changed
        let current = ctx.api.find_server(&reset.id).await?;
        let unchanged = current.is_some_and(|s| {
            s.os == reset.os && s.ssh_key == reset.ssh_key && s.instance_type == reset.instance_type
        });

        if unchanged {
            log::debug!("[njalla] server {} needs no reset", reset.id);
        } else {
            log::info!("[njalla] resetting server {}", reset.id);
            ctx.api.reset_server(&reset).await?;
        }

        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.api.remove_server(data.id()).await?;
        data.clear_id();
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let servers = ctx
            .api
            .list_servers()
            .await
            .map_err(|e| ProviderError::api_context("Listing servers failed", e))?;

        let server = servers
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ProviderError::NotFound(format!("Couldn't find server with id {id}")))?;

        let mut data = ResourceData::default();
        data.set_id(id);
        data.set("name", server.name.as_str());
        Self::apply_server(&mut data, &server);
        Ok(data)
    }
}
