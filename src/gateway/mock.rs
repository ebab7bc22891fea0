//! Scripted `RequestGateway` for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Method, RequestGateway};
use crate::errors::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

type Hook = Box<dyn Fn(&RecordedCall) + Send + Sync>;

/// Replies to requests from a queue of scripted responses.
///
/// Each `expect` entry answers the first matching request (method and
/// path) and is consumed. Unscripted requests fail with status 599.
#[derive(Default)]
pub struct MockGateway {
    script: Mutex<VecDeque<(Method, String, Result<Value, GatewayError>)>>,
    calls: Mutex<Vec<RecordedCall>>,
    hook: Option<Hook>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` on every request before it is answered.
    pub fn with_hook(mut self, hook: impl Fn(&RecordedCall) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn expect(&self, method: Method, path: &str, response: Result<Value, GatewayError>) {
        self.script
            .lock()
            .unwrap()
            .push_back((method, path.to_string(), response));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RequestGateway for MockGateway {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let call = RecordedCall {
            method,
            path: path.to_string(),
            body,
        };
        if let Some(hook) = &self.hook {
            hook(&call);
        }
        self.calls.lock().unwrap().push(call);

        let mut script = self.script.lock().unwrap();
        let position = script
            .iter()
            .position(|(m, p, _)| *m == method && p == path);
        match position.and_then(|index| script.remove(index)) {
            Some((_, _, response)) => response,
            None => Err(GatewayError::new(
                format!("no scripted response for {} {}", method, path),
                Some(599),
            )),
        }
    }
}
