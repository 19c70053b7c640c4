//! DNS record resources
//!
//! All ten record types share one implementation; [`RecordKind`] carries the
//! per-type differences (validator, priority, whether `name` has a default).

use async_trait::async_trait;
use njalla_api::{NewRecord, Record, RecordType, VALID_PRIORITY, VALID_TTL};

use crate::config::ProviderContext;
use crate::error::{ProviderError, Result};
use crate::import_id::parse_import_id;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};
use crate::validation::Validator;

use super::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
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
}

impl RecordKind {
    pub const ALL: [Self; 10] = [
        Self::Txt,
        Self::A,
        Self::Aaaa,
        Self::Mx,
        Self::Cname,
        Self::Caa,
        Self::Ptr,
        Self::Ns,
        Self::Tlsa,
        Self::Naptr,
    ];

    pub fn record_type(self) -> RecordType {
        match self {
            Self::Txt => RecordType::Txt,
            Self::A => RecordType::A,
            Self::Aaaa => RecordType::Aaaa,
            Self::Mx => RecordType::Mx,
            Self::Cname => RecordType::Cname,
            Self::Caa => RecordType::Caa,
            Self::Ptr => RecordType::Ptr,
            Self::Ns => RecordType::Ns,
            Self::Tlsa => RecordType::Tlsa,
            Self::Naptr => RecordType::Naptr,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Txt => "njalla_record_txt",
            Self::A => "njalla_record_a",
            Self::Aaaa => "njalla_record_aaaa",
            Self::Mx => "njalla_record_mx",
            Self::Cname => "njalla_record_cname",
            Self::Caa => "njalla_record_caa",
            Self::Ptr => "njalla_record_ptr",
            Self::Ns => "njalla_record_ns",
            Self::Tlsa => "njalla_record_tlsa",
            Self::Naptr => "njalla_record_naptr",
        }
    }

    fn content_validator(self) -> Option<Validator> {
        match self {
            Self::A => Some(Validator::Ipv4Address),
            Self::Aaaa => Some(Validator::Ipv6Address),
            Self::Caa => Some(Validator::CaaContent),
            Self::Tlsa => Some(Validator::TlsaContent),
            Self::Naptr => Some(Validator::NaptrContent),
            Self::Txt | Self::Mx | Self::Cname | Self::Ptr | Self::Ns => None,
        }
    }

    fn has_priority(self) -> bool {
        self == Self::Mx
    }

    /// NS records delegate a subdomain, so the apex default makes no sense.
    fn name_defaults_to_apex(self) -> bool {
        self != Self::Ns
    }
}

pub struct RecordResource {
    kind: RecordKind,
}

impl RecordResource {
    pub fn new(kind: RecordKind) -> Self {
        Self { kind }
    }

    fn record_from_data(&self, data: &ResourceData) -> Result<NewRecord> {
        let prio = if self.kind.has_priority() {
            Some(data.get_u32("priority")?)
        } else {
            None
        };
        Ok(NewRecord {
            name: data.get_str("name")?.to_string(),
            record_type: self.kind.record_type(),
            content: data.get_str("content")?.to_string(),
            ttl: data.get_u32("ttl")?,
            prio,
        })
    }

    fn apply_record(&self, data: &mut ResourceData, record: &Record) {
        data.set("name", record.name.as_str());
        data.set("ttl", record.ttl);
        data.set("content", record.content.as_str());
        if self.kind.has_priority()
            && let Some(prio) = record.prio
        {
            data.set("priority", prio);
        }
    }
}

#[async_trait]
impl Resource for RecordResource {
    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn schema(&self) -> Schema {
        let mut name = Attribute::string("Name for the record.").required();
        if self.kind.name_defaults_to_apex() {
            name = name.default_value("@");
        }

        let mut content = Attribute::string("Content for the record.").required();
        if let Some(validator) = self.kind.content_validator() {
            content = content.validate_with(validator);
        }

        let mut schema = Schema::new()
            .attribute(
                "domain",
                Attribute::string("Specifies the domain this record will be applied to.")
                    .required()
                    .force_new(),
            )
            .attribute("name", name)
            .attribute(
                "ttl",
                Attribute::int("TTL for the record.")
                    .required()
                    .validate_with(Validator::IntInSlice(VALID_TTL)),
            )
            .attribute("content", content);

        if self.kind.has_priority() {
            schema = schema.attribute(
                "priority",
                Attribute::int("Priority for the record.")
                    .required()
                    .validate_with(Validator::IntInSlice(VALID_PRIORITY)),
            );
        }

        schema
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain = data.get_str("domain")?.to_string();
        let record = self.record_from_data(data)?;

        let saved = ctx.api.add_record(&domain, &record).await?;
        log::info!(
            "[njalla] {} {} created in {domain}",
            self.type_name(),
            saved.id
        );
        data.set_id(saved.id.to_string());

        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain = data.get_str("domain")?.to_string();
        let id = data.numeric_id()?;

        match ctx.api.find_record(&domain, id).await? {
            Some(record) => self.apply_record(data, &record),
            None => {
                log::warn!(
                    "[njalla] {} {id} no longer exists in {domain}, removing from state",
                    self.type_name()
                );
                data.clear_id();
            }
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain = data.get_str("domain")?.to_string();
        let id = data.numeric_id()?;
        let record = self.record_from_data(data)?.with_id(id);

        ctx.api.edit_record(&domain, &record).await?;

        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain = data.get_str("domain")?.to_string();
        let id = data.numeric_id()?;

        match ctx.api.remove_record(&domain, id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::warn!("[njalla] {} {id} was already removed: {e}", self.type_name());
            }
            Err(e) => return Err(e.into()),
        }

        data.clear_id();
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let (domain, record_id) = parse_import_id(id)?;

        let records = ctx.api.list_records(&domain).await.map_err(|e| {
            ProviderError::api_context(format!("Reading records for domain {domain} failed"), e)
        })?;

        let record = records
            .into_iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| {
                ProviderError::NotFound(format!(
                    "Couldn't find record {record_id} for domain {domain}"
                ))
            })?;

        if record.record_type != self.kind.record_type() {
            return Err(ProviderError::RecordTypeMismatch {
                record_id,
                domain,
                actual: record.record_type.to_string(),
                expected: self.kind.record_type().to_string(),
            });
        }

        let mut data = ResourceData::default();
        data.set_id(record_id.to_string());
        data.set("domain", domain);
        self.apply_record(&mut data, &record);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use njalla_api::NjallaError;
    use serde_json::json;

    use super::*;
    use crate::test_mocks::{MockNjallaApi, object};

    const DOMAIN: &str = "example.com";

    fn setup() -> (Arc<MockNjallaApi>, ProviderContext) {
        let api = Arc::new(MockNjallaApi::new().with_domain(DOMAIN));
        let ctx = ProviderContext::new(api.clone());
        (api, ctx)
    }

    fn mx() -> RecordResource {
        RecordResource::new(RecordKind::Mx)
    }

    #[test]
    fn schema_name_default_except_ns() {
        let a = RecordResource::new(RecordKind::A).schema();
        assert_eq!(a.get("name").unwrap().default, Some(json!("@")));
        assert!(a.get("priority").is_none());

        let ns = RecordResource::new(RecordKind::Ns).schema();
        assert!(ns.get("name").unwrap().default.is_none());
        assert!(ns.get("name").unwrap().required);
    }

    #[test]
    fn schema_domain_forces_replacement() {
        for kind in RecordKind::ALL {
            let schema = RecordResource::new(kind).schema();
            assert!(schema.get("domain").unwrap().force_new, "{kind:?}");
            assert_eq!(
                schema.get("priority").is_some(),
                kind == RecordKind::Mx,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn schema_content_validators() {
        let a = RecordResource::new(RecordKind::A).schema();
        let diags = a.validate(&object(json!({
            "domain": DOMAIN, "name": "@", "ttl": 3600, "content": "2001:db8::1"
        })));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("valid IPv4 address"));

        let txt = RecordResource::new(RecordKind::Txt).schema();
        assert!(
            txt.validate(&object(json!({
                "domain": DOMAIN, "name": "@", "ttl": 3600, "content": "anything goes"
            })))
            .is_empty()
        );
    }

    #[tokio::test]
    async fn create_sets_id_and_refreshes() {
        let (api, ctx) = setup();
        let mut data = ResourceData::from_config(object(json!({
            "domain": DOMAIN, "name": "@", "ttl": 10800,
            "content": "mail.example.com", "priority": 10
        })));

        mx().create(&ctx, &mut data).await.unwrap();

        assert!(!data.is_gone());
        let stored = api.records(DOMAIN).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id.to_string(), data.id());
        assert_eq!(stored[0].record_type, RecordType::Mx);
        assert_eq!(stored[0].prio, Some(10));
        assert_eq!(data.get_int("priority").unwrap(), 10);
    }

    #[tokio::test]
    async fn read_refreshes_drifted_attributes() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(DOMAIN, RecordType::Txt, "txt", "remote value", 300)
            .await;
        let mut data = ResourceData::new(
            id.to_string(),
            object(json!({"domain": DOMAIN, "name": "txt", "ttl": 3600, "content": "old"})),
        );

        RecordResource::new(RecordKind::Txt)
            .read(&ctx, &mut data)
            .await
            .unwrap();

        assert_eq!(data.get_str("content").unwrap(), "remote value");
        assert_eq!(data.get_int("ttl").unwrap(), 300);
    }

    #[tokio::test]
    async fn read_missing_record_clears_id() {
        let (_api, ctx) = setup();
        let mut data = ResourceData::new(
            "999",
            object(json!({"domain": DOMAIN, "name": "@", "ttl": 3600, "content": "x"})),
        );

        RecordResource::new(RecordKind::Txt)
            .read(&ctx, &mut data)
            .await
            .unwrap();

        assert!(data.is_gone());
    }

    #[tokio::test]
    async fn update_edits_in_place() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(DOMAIN, RecordType::A, "www", "192.0.2.1", 3600)
            .await;
        let mut data = ResourceData::new(
            id.to_string(),
            object(json!({"domain": DOMAIN, "name": "www", "ttl": 300, "content": "192.0.2.2"})),
        );

        RecordResource::new(RecordKind::A)
            .update(&ctx, &mut data)
            .await
            .unwrap();

        let stored = api.records(DOMAIN).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].content, "192.0.2.2");
        assert_eq!(stored[0].ttl, 300);
        assert_eq!(data.id(), id.to_string());
    }

    #[tokio::test]
    async fn delete_removes_and_clears_id() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(DOMAIN, RecordType::Cname, "alias", "target.example.com", 3600)
            .await;
        let mut data = ResourceData::new(id.to_string(), object(json!({"domain": DOMAIN})));

        RecordResource::new(RecordKind::Cname)
            .delete(&ctx, &mut data)
            .await
            .unwrap();

        assert!(data.is_gone());
        assert!(api.records(DOMAIN).await.is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_record_succeeds() {
        let (_api, ctx) = setup();
        let mut data = ResourceData::new("404", object(json!({"domain": DOMAIN})));

        RecordResource::new(RecordKind::Txt)
            .delete(&ctx, &mut data)
            .await
            .unwrap();

        assert!(data.is_gone());
    }

    #[tokio::test]
    async fn delete_propagates_other_errors() {
        let (api, ctx) = setup();
        api.fail_next(NjallaError::InvalidCredentials { raw_message: None })
            .await;
        let mut data = ResourceData::new("1", object(json!({"domain": DOMAIN})));

        let err = RecordResource::new(RecordKind::Txt)
            .delete(&ctx, &mut data)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api(NjallaError::InvalidCredentials { .. })));
        assert!(!data.is_gone());
    }

    #[tokio::test]
    async fn import_sets_every_attribute() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(DOMAIN, RecordType::Mx, "@", "mail.example.com", 10800)
            .await;
        api.set_record_prio(DOMAIN, id, 20).await;

        let data = mx()
            .import(&ctx, &format!("{DOMAIN}:{id}"))
            .await
            .unwrap();

        assert_eq!(data.id(), id.to_string());
        assert_eq!(data.get_str("domain").unwrap(), DOMAIN);
        assert_eq!(data.get_str("name").unwrap(), "@");
        assert_eq!(data.get_int("ttl").unwrap(), 10800);
        assert_eq!(data.get_str("content").unwrap(), "mail.example.com");
        assert_eq!(data.get_int("priority").unwrap(), 20);
    }

    #[tokio::test]
    async fn import_unknown_record() {
        let (_api, ctx) = setup();
        let err = mx().import(&ctx, "example.com:77").await.unwrap_err();
        assert_eq!(err.to_string(), "Couldn't find record 77 for domain example.com");
    }

    #[tokio::test]
    async fn import_bad_id() {
        let (_api, ctx) = setup();
        let err = mx().import(&ctx, "example.com").await.unwrap_err();
        assert!(matches!(err, ProviderError::ImportId(_)));
    }

    #[tokio::test]
    async fn import_wraps_list_failure() {
        let (_api, ctx) = setup();
        let err = mx().import(&ctx, "unknown.org:1").await.unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Reading records for domain unknown.org failed: "),
            "{err}"
        );
    }

    #[tokio::test]
    async fn import_rejects_other_record_type() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(DOMAIN, RecordType::Txt, "@", "v=spf1 -all", 3600)
            .await;

        let err = mx()
            .import(&ctx, &format!("{DOMAIN}:{id}"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("record {id} in domain {DOMAIN} is a TXT record, expected MX")
        );
    }

    #[tokio::test]
    async fn unmodelled_types_on_the_domain_do_not_break_records() {
        let (api, ctx) = setup();
        api.insert_record(
            DOMAIN,
            RecordType::Other("ANAME".to_string()),
            "@",
            "target.example.net",
            300,
        )
        .await;
        let id = api
            .insert_record(DOMAIN, RecordType::A, "www", "192.0.2.1", 3600)
            .await;
        let mut data = ResourceData::new(id.to_string(), object(json!({"domain": DOMAIN})));

        RecordResource::new(RecordKind::A)
            .read(&ctx, &mut data)
            .await
            .unwrap();
        assert_eq!(data.get_str("content").unwrap(), "192.0.2.1");

        let imported = RecordResource::new(RecordKind::A)
            .import(&ctx, &format!("{DOMAIN}:{id}"))
            .await
            .unwrap();
        assert_eq!(imported.get_str("name").unwrap(), "www");
    }

    #[tokio::test]
    async fn import_rejects_unmodelled_type() {
        let (api, ctx) = setup();
        let id = api
            .insert_record(
                DOMAIN,
                RecordType::Other("Redirect".to_string()),
                "go",
                "https://example.net",
                300,
            )
            .await;

        let err = RecordResource::new(RecordKind::Cname)
            .import(&ctx, &format!("{DOMAIN}:{id}"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("record {id} in domain {DOMAIN} is a Redirect record, expected CNAME")
        );
    }
}
