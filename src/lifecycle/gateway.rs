//! Post listing and transition endpoints.

use console_common::{BrandId, CalendarEntry, PostId, PostRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::schedule::ScheduleRequest;
use crate::errors::GatewayError;
use crate::gateway::{Method, RequestGateway, decode};

pub struct PostGateway<G> {
    gateway: G,
}

/// Accept either `{key: [...]}` or a bare array.
fn unwrap_listing<T: DeserializeOwned>(response: Value, key: &str) -> Result<Vec<T>, GatewayError> {
    let items = match response {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    decode(items, key)
}

impl<G: RequestGateway> PostGateway<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn list(&self, brand_id: BrandId) -> Result<Vec<PostRecord>, GatewayError> {
        let path = format!("/admin/posts?brand_id={}", brand_id);
        let response = self.gateway.send(Method::Get, &path, None).await?;
        unwrap_listing(response, "posts")
    }

    pub async fn publish(&self, post_id: PostId) -> Result<(), GatewayError> {
        let path = format!("/admin/posts/{}/publish", post_id);
        self.gateway.send(Method::Post, &path, None).await?;
        Ok(())
    }

    pub async fn schedule(&self, post_id: PostId, request: &ScheduleRequest) -> Result<(), GatewayError> {
        let path = format!("/admin/posts/{}/schedule", post_id);
        let body = serde_json::to_value(request)
            .map_err(|e| GatewayError::transport(format!("Could not encode schedule request: {}", e)))?;
        self.gateway.send(Method::Post, &path, Some(body)).await?;
        Ok(())
    }

    /// Scheduled posts in chronological order.
    pub async fn calendar(&self, brand_id: BrandId) -> Result<Vec<CalendarEntry>, GatewayError> {
        let path = format!("/admin/calendar?brand_id={}", brand_id);
        let response = self.gateway.send(Method::Get, &path, None).await?;
        unwrap_listing(response, "calendar")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use console_common::PostStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_accepts_wrapped_and_bare_arrays() {
        let post = json!({"id": 1, "status": "approved", "created_at": "2024-05-01T09:00:00Z"});
        let mock = MockGateway::new();
        mock.expect(Method::Get, "/admin/posts?brand_id=2", Ok(json!({"posts": [post.clone()]})));
        mock.expect(Method::Get, "/admin/posts?brand_id=2", Ok(json!([post])));
        let gateway = PostGateway::new(mock);

        assert_eq!(gateway.list(2).await.unwrap()[0].status, PostStatus::Approved);
        assert_eq!(gateway.list(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_sends_no_body() {
        let mock = MockGateway::new();
        mock.expect(Method::Post, "/admin/posts/9/publish", Ok(json!({"ok": true})));
        let gateway = PostGateway::new(mock);
        gateway.publish(9).await.unwrap();
        assert_eq!(gateway.gateway().calls()[0].body, None);
    }

    #[tokio::test]
    async fn test_calendar_decodes_entries() {
        let mock = MockGateway::new();
        mock.expect(
            Method::Get,
            "/admin/calendar?brand_id=2",
            Ok(json!({"calendar": [{
                "post_id": 4,
                "scheduled_for": "2024-06-01T08:00:00",
                "scheduled_timezone": "Europe/Berlin",
                "status": "scheduled"
            }]})),
        );
        let entries = PostGateway::new(mock).calendar(2).await.unwrap();
        assert_eq!(entries[0].post_id, 4);
        assert_eq!(entries[0].scheduled_for.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[tokio::test]
    async fn test_malformed_listing_is_a_gateway_error() {
        let mock = MockGateway::new();
        mock.expect(Method::Get, "/admin/posts?brand_id=2", Ok(json!({"posts": {"id": 1}})));
        let err = PostGateway::new(mock).list(2).await.unwrap_err();
        assert!(err.message.starts_with("Unexpected posts response"));
    }
}
