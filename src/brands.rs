//! Brand administration: listing, creation, updates, Meta credentials and
//! onboarding checks.
//!
//! Forms are validated locally before anything is sent; the backend applies
//! the same limits but an early error is cheaper for the operator.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use console_common::{Brand, BrandCategory, BrandId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{BrandError, GatewayError};
use crate::gateway::{Method, RequestGateway, decode};

pub const DEFAULT_BRAND_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v25.0";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]{2,80}$").expect("slug pattern is valid"));

fn check_name(name: &str) -> Result<String, BrandError> {
    let name = name.trim();
    match name.chars().count() {
        0 => Err(BrandError::invalid("name", "must not be empty")),
        n if n > 200 => Err(BrandError::invalid("name", "must be at most 200 characters")),
        _ => Ok(name.to_string()),
    }
}

fn check_description(description: Option<&str>) -> Result<Option<String>, BrandError> {
    let Some(text) = description.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > 3000 {
        return Err(BrandError::invalid("description", "must be at most 3000 characters"));
    }
    Ok(Some(text.to_string()))
}

fn parse_category(raw: &str) -> Result<BrandCategory, BrandError> {
    raw.parse().map_err(|reason: String| BrandError::invalid("category", reason))
}

/// New-brand form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandDraft {
    pub slug: String,
    pub name: String,
    pub category: BrandCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_product_label: Option<String>,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_webhook_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_user_ids: Option<String>,
}

impl BrandDraft {
    /// Start a draft with the default category and timezone.
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.trim().to_string(),
            name: name.trim().to_string(),
            category: BrandCategory::default(),
            description: None,
            primary_product_label: None,
            timezone: DEFAULT_BRAND_TIMEZONE.to_string(),
            telegram_bot_token: None,
            telegram_webhook_secret: None,
            allowed_user_ids: None,
        }
    }

    pub fn category(mut self, raw: &str) -> Result<Self, BrandError> {
        self.category = parse_category(raw)?;
        Ok(self)
    }

    /// Check every field and normalize whitespace.
    pub fn validate(mut self) -> Result<Self, BrandError> {
        self.slug = self.slug.trim().to_string();
        if !SLUG_RE.is_match(&self.slug) {
            return Err(BrandError::invalid(
                "slug",
                "use 2-80 lowercase letters, digits or hyphens",
            ));
        }
        self.name = check_name(&self.name)?;
        self.description = check_description(self.description.as_deref())?;
        if let Some(label) = &self.primary_product_label {
            let label = label.trim();
            if label.chars().count() > 120 {
                return Err(BrandError::invalid(
                    "primary product label",
                    "must be at most 120 characters",
                ));
            }
            self.primary_product_label = (!label.is_empty()).then(|| label.to_string());
        }
        if self.timezone.trim().is_empty() {
            self.timezone = DEFAULT_BRAND_TIMEZONE.to_string();
        }
        Ok(self)
    }
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrandUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BrandCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_webhook_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_user_ids: Option<String>,
}

impl BrandUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(mut self) -> Result<Self, BrandError> {
        if self.is_empty() {
            return Err(BrandError::invalid("update", "nothing to change"));
        }
        if let Some(name) = &self.name {
            self.name = Some(check_name(name)?);
        }
        if self.description.is_some() {
            self.description = check_description(self.description.as_deref())?;
        }
        Ok(self)
    }
}

/// Meta (Instagram publishing) credentials for a brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandCredentials {
    pub meta_app_id: String,
    pub meta_app_secret: String,
    pub meta_page_access_token: String,
    pub instagram_business_account_id: String,
    #[serde(default = "default_graph_version")]
    pub meta_graph_api_version: String,
}

fn default_graph_version() -> String {
    DEFAULT_GRAPH_API_VERSION.to_string()
}

impl BrandCredentials {
    pub fn validate(self) -> Result<Self, BrandError> {
        let required = [
            ("meta app id", &self.meta_app_id),
            ("meta app secret", &self.meta_app_secret),
            ("page access token", &self.meta_page_access_token),
            ("instagram business account id", &self.instagram_business_account_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BrandError::invalid(field, "is required"));
            }
        }
        Ok(self)
    }
}

/// Checks the backend reports for context only. A production brand has
/// `dry_run_mode` off, so these never gate readiness.
pub const INFORMATIONAL_CHECKS: &[&str] = &["dry_run_mode"];

/// Result of the onboarding readiness check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OnboardingReport {
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
}

impl OnboardingReport {
    /// Checks that must pass before the brand can publish.
    pub fn requirements(&self) -> impl Iterator<Item = (&str, bool)> {
        self.checks
            .iter()
            .filter(|(name, _)| !INFORMATIONAL_CHECKS.contains(&name.as_str()))
            .map(|(name, passed)| (name.as_str(), *passed))
    }

    /// Informational flags such as `dry_run_mode`, in report order.
    pub fn informational(&self) -> impl Iterator<Item = (&str, bool)> {
        self.checks
            .iter()
            .filter(|(name, _)| INFORMATIONAL_CHECKS.contains(&name.as_str()))
            .map(|(name, passed)| (name.as_str(), *passed))
    }

    pub fn is_ready(&self) -> bool {
        self.requirements().all(|(_, passed)| passed)
    }

    pub fn failing(&self) -> Vec<&str> {
        self.requirements()
            .filter(|(_, passed)| !passed)
            .map(|(name, _)| name)
            .collect()
    }
}

#[derive(Deserialize)]
struct BrandListing {
    #[serde(default)]
    brands: Vec<Brand>,
}

pub struct BrandGateway<G> {
    gateway: G,
}

impl<G: RequestGateway> BrandGateway<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Brand>, GatewayError> {
        let response = self.gateway.send(Method::Get, "/admin/brands", None).await?;
        let listing: BrandListing = decode(response, "brand listing")?;
        Ok(listing.brands)
    }

    pub async fn create(&self, draft: BrandDraft) -> Result<(), BrandError> {
        let draft = draft.validate()?;
        self.gateway
            .send(Method::Post, "/admin/brands", Some(to_body(&draft)?))
            .await?;
        tracing::info!(slug = %draft.slug, category = %draft.category, "brand created");
        Ok(())
    }

    pub async fn update(&self, brand_id: BrandId, update: BrandUpdate) -> Result<(), BrandError> {
        let update = update.validate()?;
        let path = format!("/admin/brands/{}", brand_id);
        self.gateway
            .send(Method::Put, &path, Some(to_body(&update)?))
            .await?;
        tracing::info!(brand_id, "brand updated");
        Ok(())
    }

    pub async fn set_credentials(
        &self,
        brand_id: BrandId,
        credentials: BrandCredentials,
    ) -> Result<(), BrandError> {
        let credentials = credentials.validate()?;
        let path = format!("/admin/brands/{}/credentials", brand_id);
        self.gateway
            .send(Method::Post, &path, Some(to_body(&credentials)?))
            .await?;
        tracing::info!(brand_id, "meta credentials stored");
        Ok(())
    }

    pub async fn validate_onboarding(&self, brand_id: BrandId) -> Result<OnboardingReport, GatewayError> {
        let path = format!("/admin/brands/{}/onboarding/validate", brand_id);
        let response = self.gateway.send(Method::Post, &path, None).await?;
        decode(response, "onboarding check")
    }
}

fn to_body<T: Serialize>(form: &T) -> Result<Value, BrandError> {
    serde_json::to_value(form)
        .map_err(|e| GatewayError::transport(format!("Could not encode request: {}", e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use serde_json::json;

    #[test]
    fn test_draft_defaults() {
        let draft = BrandDraft::new("vak-sarees", "Vak Sarees").validate().unwrap();
        assert_eq!(draft.category, BrandCategory::General);
        assert_eq!(draft.timezone, "Asia/Kolkata");
    }

    #[test]
    fn test_slug_rules() {
        let too_long = "x".repeat(81);
        for bad in ["a", "Has-Caps", "under_score", "with space", too_long.as_str()] {
            let err = BrandDraft::new(bad, "Name").validate().unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", bad);
        }
        assert!(BrandDraft::new("ok-2", "Name").validate().is_ok());
    }

    #[test]
    fn test_name_bounds() {
        assert!(BrandDraft::new("slug", "   ").validate().is_err());
        assert!(BrandDraft::new("slug", &"n".repeat(201)).validate().is_err());
        assert!(BrandDraft::new("slug", &"n".repeat(200)).validate().is_ok());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = BrandDraft::new("slug", "Name").category("toys").unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
    }

    #[test]
    fn test_draft_body_omits_unset_fields() {
        let draft = BrandDraft::new("slug", "Name").category("food").unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"slug": "slug", "name": "Name", "category": "food", "timezone": "Asia/Kolkata"})
        );
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(BrandUpdate::default().validate().is_err());
    }

    #[test]
    fn test_credentials_default_graph_version() {
        let creds: BrandCredentials = serde_json::from_value(json!({
            "meta_app_id": "1",
            "meta_app_secret": "s",
            "meta_page_access_token": "t",
            "instagram_business_account_id": "ig"
        }))
        .unwrap();
        assert_eq!(creds.meta_graph_api_version, "v25.0");
    }

    #[tokio::test]
    async fn test_invalid_draft_makes_no_request() {
        let gateway = BrandGateway::new(MockGateway::new());
        let err = gateway.create(BrandDraft::new("X", "Name")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let mock = MockGateway::new();
        mock.expect(Method::Put, "/admin/brands/4", Ok(json!({"ok": true})));
        let gateway = BrandGateway::new(mock);
        let update = BrandUpdate {
            timezone: Some("Europe/Paris".into()),
            ..BrandUpdate::default()
        };
        gateway.update(4, update).await.unwrap();
        assert_eq!(
            gateway.gateway.calls()[0].body,
            Some(json!({"timezone": "Europe/Paris"}))
        );
    }

    #[tokio::test]
    async fn test_list_and_onboarding() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Get,
            "/admin/brands",
            Ok(json!({"brands": [{"id": 1, "slug": "vak", "name": "Vak", "category": "fashion",
                "description": null, "timezone": "Asia/Kolkata", "status": "active"}]})),
        );
        mock.expect(
            Method::Post,
            "/admin/brands/1/onboarding/validate",
            Ok(json!({"ok": true, "checks": {"brand_exists": true, "meta_credentials_configured": false}})),
        );
        let gateway = BrandGateway::new(mock);

        let brands = gateway.list().await.unwrap();
        assert_eq!(brands[0].slug, "vak");
        let report = gateway.validate_onboarding(1).await.unwrap();
        assert!(!report.is_ready());
        assert_eq!(report.failing(), vec!["meta_credentials_configured"]);
    }

    #[test]
    fn test_production_brand_is_ready_with_dry_run_off() {
        let report: OnboardingReport = serde_json::from_value(json!({
            "ok": true,
            "checks": {
                "brand_exists": true,
                "telegram_bot_configured": true,
                "telegram_webhook_secret": true,
                "meta_credentials_configured": true,
                "dry_run_mode": false,
                "openai_configured": true,
                "claude_configured": true,
                "google_or_gemini_configured": true,
                "databright_configured": true,
                "storage_configured": true
            }
        }))
        .unwrap();

        assert!(report.is_ready());
        assert!(report.failing().is_empty());
        assert_eq!(report.informational().collect::<Vec<_>>(), vec![("dry_run_mode", false)]);
        assert_eq!(report.requirements().count(), 9);
    }

    #[test]
    fn test_dry_run_does_not_hide_missing_requirements() {
        let report: OnboardingReport = serde_json::from_value(json!({
            "checks": {"brand_exists": true, "storage_configured": false, "dry_run_mode": true}
        }))
        .unwrap();
        assert!(!report.is_ready());
        assert_eq!(report.failing(), vec!["storage_configured"]);
    }
}
