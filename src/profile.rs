//! Brand AI profile endpoints: load, replace, per-section save, and the
//! category starter templates.

use console_common::{BrandCategory, BrandId};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::document::ConfigDocument;
use crate::editor::tabs::SectionSpec;
use crate::errors::GatewayError;
use crate::gateway::{Method, RequestGateway, decode};

/// What the config endpoint returns for one brand.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub category: Option<String>,
    pub config: ConfigDocument,
}

/// Starter profile the backend seeds for a brand category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryTemplate {
    pub category: String,
    #[serde(rename = "template_json")]
    pub template: ConfigDocument,
}

#[derive(Deserialize)]
struct TemplateListing {
    #[serde(default)]
    templates: Vec<CategoryTemplate>,
}

pub struct ProfileGateway<G> {
    gateway: G,
}

fn config_path(brand_id: BrandId) -> String {
    format!("/admin/api/brands/{}/ai-config", brand_id)
}

fn extract_config(response: &Value) -> Option<ConfigDocument> {
    response
        .get("config")
        .filter(|config| config.is_object())
        .and_then(|config| ConfigDocument::from_value(config.clone()).ok())
}

impl<G: RequestGateway> ProfileGateway<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn load(&self, brand_id: BrandId) -> Result<ProfileSnapshot, GatewayError> {
        let response = self
            .gateway
            .send(Method::Get, &config_path(brand_id), None)
            .await?;
        let config = extract_config(&response).ok_or_else(|| {
            GatewayError::transport(format!(
                "Profile response for brand {} has no config document",
                brand_id
            ))
        })?;
        let category = response
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string);
        tracing::info!(brand_id, keys = config.as_map().len(), "profile loaded");
        Ok(ProfileSnapshot { category, config })
    }

    /// Replace the stored profile and return the stored form.
    ///
    /// The backend may normalize or default fields. When the response only
    /// acknowledges the write, the stored document is read back.
    pub async fn save(
        &self,
        brand_id: BrandId,
        document: &ConfigDocument,
    ) -> Result<ConfigDocument, GatewayError> {
        let body = json!({ "config": document.to_value() });
        let response = self
            .gateway
            .send(Method::Put, &config_path(brand_id), Some(body))
            .await?;
        tracing::info!(brand_id, "profile saved");
        match extract_config(&response) {
            Some(stored) => Ok(stored),
            None => Ok(self.load(brand_id).await?.config),
        }
    }

    /// Save one section. The backend only acknowledges, so the stored
    /// profile is read back and returned whole.
    pub async fn save_section(
        &self,
        brand_id: BrandId,
        section: &SectionSpec,
        document: &ConfigDocument,
    ) -> Result<ConfigDocument, GatewayError> {
        let path = format!("{}/{}", config_path(brand_id), section.id);
        self.gateway
            .send(Method::Patch, &path, Some(section.payload(document)))
            .await?;
        tracing::info!(brand_id, section = section.id, "profile section saved");
        Ok(self.load(brand_id).await?.config)
    }

    /// Starter templates for every category.
    pub async fn templates(&self) -> Result<Vec<CategoryTemplate>, GatewayError> {
        let response = self
            .gateway
            .send(Method::Get, "/admin/api/category-templates", None)
            .await?;
        let listing: TemplateListing = decode(response, "template listing")?;
        Ok(listing.templates)
    }

    pub async fn template(&self, category: BrandCategory) -> Result<CategoryTemplate, GatewayError> {
        let path = format!("/admin/api/category-templates/{}", category.as_str());
        let response = self.gateway.send(Method::Get, &path, None).await?;
        decode(response, "category template")
    }

    /// Reset the profile to the category starter template server-side.
    pub async fn apply_template(
        &self,
        brand_id: BrandId,
        category: BrandCategory,
    ) -> Result<(), GatewayError> {
        let path = format!("/admin/api/brands/{}/apply-template", brand_id);
        self.gateway
            .send(Method::Post, &path, Some(json!({ "category": category.as_str() })))
            .await?;
        tracing::info!(brand_id, category = %category, "category template applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;

    fn stored() -> Value {
        json!({"language": "en", "caption_rules": {"max_length": 280}})
    }

    #[tokio::test]
    async fn test_load_reads_category_and_config() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Get,
            "/admin/api/brands/7/ai-config",
            Ok(json!({"brand_id": 7, "category": "food", "config": stored()})),
        );
        let snapshot = ProfileGateway::new(mock).load(7).await.unwrap();
        assert_eq!(snapshot.category.as_deref(), Some("food"));
        assert_eq!(snapshot.config.to_value(), stored());
    }

    #[tokio::test]
    async fn test_load_without_config_is_an_error() {
        let mock = MockGateway::new();
        mock.expect(Method::Get, "/admin/api/brands/7/ai-config", Ok(json!({"config": []})));
        let err = ProfileGateway::new(mock).load(7).await.unwrap_err();
        assert!(err.message.contains("no config document"));
    }

    #[tokio::test]
    async fn test_save_uses_returned_document_when_present() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Put,
            "/admin/api/brands/7/ai-config",
            Ok(json!({"ok": true, "config": stored()})),
        );
        let gateway = ProfileGateway::new(mock);
        let doc = ConfigDocument::from_value(json!({"language": "en"})).unwrap();
        let saved = gateway.save(7, &doc).await.unwrap();

        assert_eq!(saved.to_value(), stored());
        let calls = gateway.gateway().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body, Some(json!({"config": {"language": "en"}})));
    }

    #[tokio::test]
    async fn test_save_reads_back_when_only_acknowledged() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Put,
            "/admin/api/brands/7/ai-config",
            Ok(json!({"ok": true, "brand_id": 7})),
        );
        mock.expect(
            Method::Get,
            "/admin/api/brands/7/ai-config",
            Ok(json!({"category": "general", "config": stored()})),
        );
        let gateway = ProfileGateway::new(mock);
        let saved = gateway.save(7, &ConfigDocument::new()).await.unwrap();
        assert_eq!(saved.to_value(), stored());
        assert_eq!(gateway.gateway().call_count(), 2);
    }

    #[tokio::test]
    async fn test_save_failure_propagates_status() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Put,
            "/admin/api/brands/7/ai-config",
            Err(GatewayError::new("forbidden", Some(403))),
        );
        let err = ProfileGateway::new(mock)
            .save(7, &ConfigDocument::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(403));
    }

    #[tokio::test]
    async fn test_save_section_patches_then_reads_back() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Patch,
            "/admin/api/brands/7/ai-config/hashtags",
            Ok(json!({"ok": true, "brand_id": 7, "section": "hashtags"})),
        );
        mock.expect(
            Method::Get,
            "/admin/api/brands/7/ai-config",
            Ok(json!({"config": {"hashtags": {"niche": ["#handloom"]}, "language": "en"}})),
        );
        let gateway = ProfileGateway::new(mock);
        let doc = ConfigDocument::from_value(json!({
            "hashtags": {"niche": ["#handloom"]},
            "language": "hi"
        }))
        .unwrap();
        let section = crate::editor::tabs::section("hashtags").unwrap();

        let stored = gateway.save_section(7, section, &doc).await.unwrap();

        let calls = gateway.gateway().calls();
        assert_eq!(calls[0].body, Some(json!({"hashtags": {"niche": ["#handloom"]}})));
        assert_eq!(stored.to_value()["language"], json!("en"));
    }

    #[tokio::test]
    async fn test_templates_list_and_single() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Get,
            "/admin/api/category-templates",
            Ok(json!({"templates": [
                {"category": "fashion", "template_json": {"language": "en"}},
                {"category": "food", "template_json": {"language": "en", "colors": {}}}
            ]})),
        );
        mock.expect(
            Method::Get,
            "/admin/api/category-templates/food",
            Ok(json!({"category": "food", "template_json": {"language": "en", "colors": {}}})),
        );
        let gateway = ProfileGateway::new(mock);

        let all = gateway.templates().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].category, "food");
        let food = gateway.template(BrandCategory::Food).await.unwrap();
        assert_eq!(food.template.keys().collect::<Vec<_>>(), vec!["colors", "language"]);
    }

    #[tokio::test]
    async fn test_apply_template_posts_category() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Post,
            "/admin/api/brands/7/apply-template",
            Ok(json!({"ok": true})),
        );
        let gateway = ProfileGateway::new(mock);
        gateway.apply_template(7, BrandCategory::Beauty).await.unwrap();
        assert_eq!(
            gateway.gateway().calls()[0].body,
            Some(json!({"category": "beauty"}))
        );
    }
}
