use std::collections::HashMap;

use async_trait::async_trait;
use njalla_api::{
    Domain, NewRecord, NewServer, NjallaApi, NjallaError, Record, RecordType, Server, ServerReset,
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// Unwraps a `json!` object literal into an attribute map.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

struct MockServer {
    server: Server,
    /// `list-servers` calls left before the address shows up
    polls_remaining: u32,
}

#[derive(Default)]
struct MockState {
    domains: Vec<Domain>,
    records: HashMap<String, Vec<Record>>,
    servers: Vec<MockServer>,
    next_id: u64,
    provisioning_polls: u32,
    registrations: Vec<(String, u32)>,
    calls: Vec<String>,
    fail_next: Option<NjallaError>,
}

/// In-memory Njalla account.
#[derive(Default)]
pub struct MockNjallaApi {
    state: Mutex<MockState>,
}

impl MockNjallaApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(self, name: &str) -> Self {
        {
            let mut state = self.state.try_lock().unwrap();
            state.domains.push(Domain {
                name: name.to_string(),
                status: "active".to_string(),
                expiry: None,
            });
            state.records.entry(name.to_string()).or_default();
        }
        self
    }

    pub fn with_server(self, server: Server) -> Self {
        self.state.try_lock().unwrap().servers.push(MockServer {
            server,
            polls_remaining: 0,
        });
        self
    }

    /// Number of `list-servers` calls a new server stays without an address.
    pub fn with_provisioning_polls(self, polls: u32) -> Self {
        self.state.try_lock().unwrap().provisioning_polls = polls;
        self
    }

    /// Makes the next API call fail with `error`.
    pub async fn fail_next(&self, error: NjallaError) {
        self.state.lock().await.fail_next = Some(error);
    }

    pub async fn insert_record(
        &self,
        domain: &str,
        record_type: RecordType,
        name: &str,
        content: &str,
        ttl: u32,
    ) -> u64 {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        state.records.entry(domain.to_string()).or_default().push(Record {
            id,
            name: name.to_string(),
            record_type,
            content: content.to_string(),
            ttl,
            prio: None,
        });
        id
    }

    pub async fn set_record_prio(&self, domain: &str, id: u64, prio: u32) {
        let mut state = self.state.lock().await;
        let record = state
            .records
            .get_mut(domain)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .unwrap();
        record.prio = Some(prio);
    }

    pub async fn records(&self, domain: &str) -> Vec<Record> {
        self.state
            .lock()
            .await
            .records
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn servers(&self) -> Vec<Server> {
        self.state
            .lock()
            .await
            .servers
            .iter()
            .map(|s| s.server.clone())
            .collect()
    }

    pub async fn registrations(&self) -> Vec<(String, u32)> {
        self.state.lock().await.registrations.clone()
    }

    /// JSON-RPC method names called so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn count_calls(&self, method: &str) -> usize {
        self.calls().await.iter().filter(|c| *c == method).count()
    }
}

impl MockState {
    fn begin(&mut self, method: &str) -> Result<(), NjallaError> {
        self.calls.push(method.to_string());
        self.fail_next.take().map_or(Ok(()), Err)
    }

    fn domain_records(&mut self, domain: &str) -> Result<&mut Vec<Record>, NjallaError> {
        self.records
            .get_mut(domain)
            .ok_or_else(|| NjallaError::DomainNotFound {
                domain: domain.to_string(),
                raw_message: Some("Domain not found".to_string()),
            })
    }
}

fn record_not_found(id: u64) -> NjallaError {
    NjallaError::RecordNotFound {
        record_id: id.to_string(),
        raw_message: Some("Record not found".to_string()),
    }
}

fn server_not_found(id: &str) -> NjallaError {
    NjallaError::ServerNotFound {
        server_id: id.to_string(),
        raw_message: Some("Server not found".to_string()),
    }
}

#[async_trait]
impl NjallaApi for MockNjallaApi {
    async fn list_domains(&self) -> njalla_api::Result<Vec<Domain>> {
        let mut state = self.state.lock().await;
        state.begin("list-domains")?;
        Ok(state.domains.clone())
    }

    async fn get_domain(&self, domain: &str) -> njalla_api::Result<Domain> {
        let mut state = self.state.lock().await;
        state.begin("get-domain")?;
        state
            .domains
            .iter()
            .find(|d| d.name == domain)
            .cloned()
            .ok_or_else(|| NjallaError::DomainNotFound {
                domain: domain.to_string(),
                raw_message: None,
            })
    }

    async fn register_domain(&self, domain: &str, years: u32) -> njalla_api::Result<String> {
        let mut state = self.state.lock().await;
        state.begin("register-domain")?;
        if state.domains.iter().any(|d| d.name == domain) {
            return Err(NjallaError::InvalidParameter {
                param: "domain".to_string(),
                detail: format!("Failed to buy {domain}"),
            });
        }
        state.registrations.push((domain.to_string(), years));
        state.domains.push(Domain {
            name: domain.to_string(),
            status: "active".to_string(),
            expiry: None,
        });
        state.records.entry(domain.to_string()).or_default();
        Ok(format!("task-{}", state.registrations.len()))
    }

    async fn list_records(&self, domain: &str) -> njalla_api::Result<Vec<Record>> {
        let mut state = self.state.lock().await;
        state.begin("list-records")?;
        Ok(state.domain_records(domain)?.clone())
    }

    async fn add_record(&self, domain: &str, record: &NewRecord) -> njalla_api::Result<Record> {
        let mut state = self.state.lock().await;
        state.begin("add-record")?;
        let id = state.next_id + 1;
        let saved = record.clone().with_id(id);
        state.domain_records(domain)?.push(saved.clone());
        state.next_id = id;
        Ok(saved)
    }

    async fn edit_record(&self, domain: &str, record: &Record) -> njalla_api::Result<()> {
        let mut state = self.state.lock().await;
        state.begin("edit-record")?;
        let existing = state
            .domain_records(domain)?
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| record_not_found(record.id))?;
        *existing = record.clone();
        Ok(())
    }

    async fn remove_record(&self, domain: &str, record_id: u64) -> njalla_api::Result<()> {
        let mut state = self.state.lock().await;
        state.begin("remove-record")?;
        let records = state.domain_records(domain)?;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(record_not_found(record_id));
        }
        Ok(())
    }

    async fn list_servers(&self) -> njalla_api::Result<Vec<Server>> {
        let mut state = self.state.lock().await;
        state.begin("list-servers")?;
        let snapshot: Vec<Server> = state
            .servers
            .iter_mut()
            .map(|s| {
                let mut server = s.server.clone();
                if s.polls_remaining > 0 {
                    server.ips.clear();
                    s.polls_remaining -= 1;
                }
                server
            })
            .collect();
        Ok(snapshot)
    }

    async fn add_server(&self, server: &NewServer) -> njalla_api::Result<Server> {
        let mut state = self.state.lock().await;
        state.begin("add-server")?;
        state.next_id += 1;
        let id = format!("srv-{}", state.next_id);
        let created = Server {
            id: id.clone(),
            name: server.name.clone(),
            instance_type: server.instance_type.clone(),
            status: "running".to_string(),
            os: server.os.clone(),
            ssh_key: server.ssh_key.clone(),
            ips: vec![format!("192.0.2.{}", state.next_id % 250 + 1)],
            reverse_name: None,
            os_state: Some("installed".to_string()),
            autorenew: false,
            expiry: None,
        };
        let polls_remaining = state.provisioning_polls;
        state.servers.push(MockServer {
            server: created,
            polls_remaining,
        });
        Ok(Server {
            id,
            ..serde_json::from_str(r#"{"id":""}"#).unwrap()
        })
    }

    async fn reset_server(&self, reset: &ServerReset) -> njalla_api::Result<()> {
        let mut state = self.state.lock().await;
        state.begin("reset-server")?;
        let entry = state
            .servers
            .iter_mut()
            .find(|s| s.server.id == reset.id)
            .ok_or_else(|| server_not_found(&reset.id))?;
        entry.server.os.clone_from(&reset.os);
        entry.server.ssh_key.clone_from(&reset.ssh_key);
        entry.server.instance_type.clone_from(&reset.instance_type);
        Ok(())
    }

    async fn remove_server(&self, server_id: &str) -> njalla_api::Result<()> {
        let mut state = self.state.lock().await;
        state.begin("remove-server")?;
        let before = state.servers.len();
        state.servers.retain(|s| s.server.id != server_id);
        if state.servers.len() == before {
            return Err(server_not_found(server_id));
        }
        Ok(())
    }
}
