use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use serde_json::Value;

use super::{Method, RequestGateway};
use crate::errors::GatewayError;

/// Header the backend checks on every mutating request.
pub const CSRF_HEADER: &str = "x-csrf-token";
pub const SESSION_COOKIE: &str = "admin_session";
pub const CSRF_COOKIE: &str = "admin_csrf";

/// Session material obtained out of band (the login flow is not part of
/// the console).
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    pub session_cookie: Option<String>,
    pub csrf_token: Option<String>,
}

impl SessionCredentials {
    fn cookie_header(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(session) = &self.session_cookie {
            parts.push(format!("{}={}", SESSION_COOKIE, session));
        }
        if let Some(csrf) = &self.csrf_token {
            parts.push(format!("{}={}", CSRF_COOKIE, csrf));
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

/// `RequestGateway` over HTTP with reqwest.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionCredentials,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        session: SessionCredentials,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("brand-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Pull a human message out of an error body.
///
/// Understands `{"detail": "..."}`, validation lists
/// (`{"detail": [{"msg": "..."}]}`), and `error`/`message` fields. Falls back
/// to the raw body, then to the status reason.
pub fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let url = self.url(path);
        tracing::debug!(method = %method, %url, "sending request");

        let mut request = self.client.request(to_reqwest(method), &url);
        if let Some(cookie) = self.session.cookie_header() {
            request = request.header(COOKIE, cookie);
        }
        if method.is_mutating()
            && let Some(token) = &self.session.csrf_token
        {
            request = request.header(CSRF_HEADER, token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, %url, error = %e, "request failed");
            GatewayError::transport(format!("Request to {} failed: {}", path, e))
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::new(
                format!("Failed to read response from {}: {}", path, e),
                Some(status.as_u16()),
            )
        })?;

        if !status.is_success() {
            let message = error_message(&text, status);
            tracing::warn!(method = %method, %url, status = status.as_u16(), %message, "request rejected");
            return Err(GatewayError::new(message, Some(status.as_u16())));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            GatewayError::new(
                format!("Response from {} was not a JSON body: {}", path, e),
                Some(status.as_u16()),
            )
        })
    }
}
