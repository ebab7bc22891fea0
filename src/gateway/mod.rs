//! Generic request/response boundary to the brand admin backend.
//!
//! Everything above this module talks to the backend through
//! [`RequestGateway::send`]. Real implementation: [`HttpGateway`]. Test
//! double: `mock::MockGateway`.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::GatewayError;

pub use http::{HttpGateway, SessionCredentials};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Mutating methods carry the anti-forgery token.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Send one request and return the JSON-decoded response body.
    ///
    /// An empty success body decodes to `Value::Null`. Non-2xx responses and
    /// transport failures come back as [`GatewayError`]. Never retries.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError>;
}

#[async_trait]
impl<G: RequestGateway + ?Sized> RequestGateway for Arc<G> {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        (**self).send(method, path, body).await
    }
}

/// Decode a response body into a typed value, naming `what` on failure.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::transport(format!("Unexpected {} response: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_get_is_non_mutating() {
        assert!(!Method::Get.is_mutating());
        for method in [Method::Post, Method::Put, Method::Patch, Method::Delete] {
            assert!(method.is_mutating(), "{} should be mutating", method);
        }
    }

    #[test]
    fn test_decode_names_the_payload_on_failure() {
        let err = decode::<Vec<i64>>(serde_json::json!({"not": "a list"}), "post listing")
            .unwrap_err();
        assert!(err.message.starts_with("Unexpected post listing response"));
    }
}
