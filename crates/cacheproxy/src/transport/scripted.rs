//! Transport that replays queued responses and records every request.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use cacheproxy_core::protocol::{HttpRequest, HttpResponse, Transport};
use cacheproxy_core::{CacheProxyError, Result};

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

/// Replays responses in the order they were queued.
///
/// Clones share the same script, so a test can keep one handle to inspect
/// requests while the proxy owns another. Running out of responses is a
/// `CacheProxyError::Connection`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `PING` answer so the transport can back a connecting proxy.
    pub fn with_pong(self) -> Self {
        self.push_json(serde_json::json!({"result": "PONG"}));
        self
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.lock()
            .responses
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queues a 200 response with a JSON body.
    pub fn push_json(&self, body: Value) {
        self.push_response(200, body.to_string());
    }

    /// Queues a failure to complete the exchange.
    pub fn push_error(&self, error: CacheProxyError) {
        self.lock().responses.push_back(Err(error));
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut script = self.lock();
        script.requests.push(request);
        script.responses.pop_front().unwrap_or_else(|| {
            Err(CacheProxyError::Connection(
                "no scripted response left".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> HttpRequest {
        HttpRequest {
            url: "https://x".to_string(),
            headers: vec![],
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let transport = ScriptedTransport::new();
        transport.push_response(200, "first");
        transport.push_response(500, "second");

        let first = transport.post(request("a")).await.unwrap();
        let second = transport.post(request("b")).await.unwrap();

        assert_eq!(first, HttpResponse::new(200, "first"));
        assert_eq!(second, HttpResponse::new(500, "second"));
        let bodies: Vec<String> = transport.requests().into_iter().map(|r| r.body).collect();
        assert_eq!(bodies, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_connection_error() {
        let transport = ScriptedTransport::new();
        let result = transport.post(request("a")).await;
        assert!(matches!(result, Err(CacheProxyError::Connection(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let transport = ScriptedTransport::new();
        let handle = transport.clone();
        transport.push_error(CacheProxyError::Connection("refused".to_string()));

        let result = handle.post(request("a")).await;
        assert_eq!(
            result,
            Err(CacheProxyError::Connection("refused".to_string()))
        );
        assert_eq!(transport.last_request().unwrap().body, "a");
    }
}
