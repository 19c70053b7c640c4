//! [`NjallaApi`] implementation for [`NjallaClient`]

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{NjallaError, Result};
use crate::traits::{ErrorContext, NjallaApi};
use crate::types::{Domain, NewRecord, NewServer, Record, Server, ServerReset};

use super::NjallaClient;

#[derive(Deserialize)]
struct DomainList {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<Server>,
}

#[derive(Deserialize)]
struct TaskResult {
    task: serde_json::Value,
}

#[async_trait]
impl NjallaApi for NjallaClient {
    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let list: DomainList = self
            .call("list-domains", &json!({}), ErrorContext::default())
            .await?;
        log::debug!("[njalla] listed {} domains", list.domains.len());
        Ok(list.domains)
    }

    async fn get_domain(&self, domain: &str) -> Result<Domain> {
        self.call(
            "get-domain",
            &json!({ "domain": domain }),
            ErrorContext::domain(domain),
        )
        .await
    }

    async fn register_domain(&self, domain: &str, years: u32) -> Result<String> {
        let result: TaskResult = self
            .call(
                "register-domain",
                &json!({ "domain": domain, "years": years }),
                ErrorContext::domain(domain),
            )
            .await?;

        let task = match result.task {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(NjallaError::ParseError {
                    detail: format!("unexpected task id in register-domain result: {other}"),
                });
            }
        };
        log::info!("[njalla] registration of {domain} queued as task {task}");
        Ok(task)
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<Record>> {
        let list: RecordList = self
            .call(
                "list-records",
                &json!({ "domain": domain }),
                ErrorContext::domain(domain),
            )
            .await?;
        Ok(list.records)
    }

    async fn add_record(&self, domain: &str, record: &NewRecord) -> Result<Record> {
        let mut params = json!({
            "domain": domain,
            "type": record.record_type,
            "name": record.name,
            "content": record.content,
            "ttl": record.ttl,
        });
        if let Some(prio) = record.prio {
            params["prio"] = json!(prio);
        }

        let created: Record = self
            .call("add-record", &params, ErrorContext::domain(domain))
            .await?;
        log::info!(
            "[njalla] created {} record {} in {domain}",
            created.record_type,
            created.id
        );
        Ok(created)
    }

    async fn edit_record(&self, domain: &str, record: &Record) -> Result<()> {
        let mut params = json!({
            "domain": domain,
            "id": record.id,
            "type": record.record_type,
            "name": record.name,
            "content": record.content,
            "ttl": record.ttl,
        });
        if let Some(prio) = record.prio {
            params["prio"] = json!(prio);
        }

        let _: serde_json::Value = self
            .call(
                "edit-record",
                &params,
                ErrorContext::record(domain, record.id),
            )
            .await?;
        Ok(())
    }

    async fn remove_record(&self, domain: &str, record_id: u64) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "remove-record",
                &json!({ "domain": domain, "id": record_id }),
                ErrorContext::record(domain, record_id),
            )
            .await?;
        log::info!("[njalla] removed record {record_id} from {domain}");
        Ok(())
    }

    async fn list_servers(&self) -> Result<Vec<Server>> {
        let list: ServerList = self
            .call("list-servers", &json!({}), ErrorContext::default())
            .await?;
        Ok(list.servers)
    }

    async fn add_server(&self, server: &NewServer) -> Result<Server> {
        let created: Server = self
            .call("add-server", server, ErrorContext::default())
            .await?;
        log::info!("[njalla] ordered server {} ({})", created.id, server.name);
        Ok(created)
    }

    async fn reset_server(&self, reset: &ServerReset) -> Result<()> {
        let _: serde_json::Value = self
            .call("reset-server", reset, ErrorContext::server(&reset.id))
            .await?;
        Ok(())
    }

    async fn remove_server(&self, server_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "remove-server",
                &json!({ "id": server_id }),
                ErrorContext::server(server_id),
            )
            .await?;
        log::info!("[njalla] removed server {server_id}");
        Ok(())
    }
}
