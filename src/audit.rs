//! Backend audit trail: who changed which brand, profile or post, and when.

use chrono::{DateTime, Utc};
use console_common::BrandId;
use serde::Deserialize;
use serde_json::Value;

use crate::document::fields::render_scalar;
use crate::errors::GatewayError;
use crate::gateway::{Method, RequestGateway, decode};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default, with = "console_common::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AuditEntry {
    /// `entity_type:entity_id`, or whichever half is present.
    pub fn entity(&self) -> String {
        match (&self.entity_type, &self.entity_id) {
            (Some(kind), Some(id)) => format!("{}:{}", kind, id),
            (Some(kind), None) => kind.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => String::new(),
        }
    }

    /// One-line `key=value` rendering of the details object.
    pub fn details_summary(&self) -> String {
        match &self.details {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| format!("{}={}", key, render_scalar(value)))
                .collect::<Vec<_>>()
                .join(" "),
            Some(Value::Null) | None => String::new(),
            Some(other) => render_scalar(other),
        }
    }
}

#[derive(Deserialize)]
struct AuditListing {
    #[serde(default)]
    audit_logs: Vec<AuditEntry>,
}

pub struct AuditGateway<G> {
    gateway: G,
}

impl<G: RequestGateway> AuditGateway<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Newest first. Without a brand, the backend returns every brand the
    /// session can see.
    pub async fn list(&self, brand_id: Option<BrandId>) -> Result<Vec<AuditEntry>, GatewayError> {
        let path = match brand_id {
            Some(brand_id) => format!("/admin/audit-logs?brand_id={}", brand_id),
            None => "/admin/audit-logs".to_string(),
        };
        let response = self.gateway.send(Method::Get, &path, None).await?;
        let listing: AuditListing = decode(response, "audit log listing")?;
        Ok(listing.audit_logs)
    }
}

/// Entries whose action starts with `prefix` (e.g. `brand.ai_profile`).
pub fn filter_by_action<'a>(entries: &'a [AuditEntry], prefix: &str) -> Vec<&'a AuditEntry> {
    entries
        .iter()
        .filter(|entry| entry.action.starts_with(prefix))
        .collect()
}
