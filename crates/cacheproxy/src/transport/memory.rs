//! In-memory emulation of the Upstash REST API.
//!
//! Interprets the subset of Redis commands the proxy sends (`PING`, `GET`,
//! `SET [EX]`, `DEL`, `SADD`, `SREM`, `SMEMBERS`) against local maps, so the
//! full proxy can be exercised without a network. Expiration is lazy: expired
//! values are dropped when they are read.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use cacheproxy_core::protocol::{HttpRequest, HttpResponse, Transport};
use cacheproxy_core::Result;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

#[derive(Debug, Default)]
struct Store {
    strings: HashMap<String, StoredValue>,
    sets: HashMap<String, HashSet<String>>,
}

impl Store {
    fn get(&mut self, key: &str) -> Value {
        if self.strings.get(key).is_some_and(StoredValue::is_expired) {
            self.strings.remove(key);
        }
        self.strings
            .get(key)
            .map(|stored| Value::from(stored.value.clone()))
            .unwrap_or(Value::Null)
    }

    fn execute(&mut self, tokens: &[Value]) -> Value {
        let args: Vec<String> = tokens.iter().map(token_to_string).collect();
        let Some((verb, rest)) = args.split_first() else {
            return error("ERR empty command");
        };

        match (verb.to_ascii_uppercase().as_str(), rest) {
            ("PING", []) => json!({"result": "PONG"}),
            ("GET", [key]) => json!({"result": self.get(key)}),
            ("SET", [key, value]) => self.set(key, value, None),
            ("SET", [key, value, ex, seconds]) if ex.eq_ignore_ascii_case("EX") => {
                match seconds.parse::<u64>() {
                    Ok(seconds) if seconds > 0 => {
                        self.set(key, value, Some(Duration::from_secs(seconds)))
                    }
                    _ => error("ERR invalid expire time in 'set' command"),
                }
            }
            ("DEL", keys) if !keys.is_empty() => {
                let removed = keys
                    .iter()
                    .filter(|key| {
                        self.strings.remove(key.as_str()).is_some()
                            || self.sets.remove(key.as_str()).is_some()
                    })
                    .count();
                json!({"result": removed})
            }
            ("SADD", [set, members @ ..]) if !members.is_empty() => {
                let entry = self.sets.entry(set.clone()).or_default();
                let added = members
                    .iter()
                    .filter(|member| entry.insert((*member).clone()))
                    .count();
                json!({"result": added})
            }
            ("SREM", [set, members @ ..]) if !members.is_empty() => {
                let removed = match self.sets.get_mut(set) {
                    Some(entry) => members.iter().filter(|member| entry.remove(*member)).count(),
                    None => 0,
                };
                json!({"result": removed})
            }
            ("SMEMBERS", [set]) => {
                let mut members: Vec<&String> = self
                    .sets
                    .get(set)
                    .map(|entry| entry.iter().collect())
                    .unwrap_or_default();
                members.sort();
                json!({"result": members})
            }
            _ => error(&format!("ERR unsupported command '{}'", verb)),
        }
    }

    fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) -> Value {
        self.strings.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        json!({"result": "OK"})
    }
}

fn token_to_string(token: &Value) -> String {
    match token {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error(message: &str) -> Value {
    json!({ "error": message })
}

/// Transport answering requests from an in-memory store.
///
/// Requests must carry `Authorization: Bearer {token}` for the configured
/// token, otherwise the response is a 401 like the real service returns.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    token: String,
    store: Arc<Mutex<Store>>,
}

impl MemoryTransport {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            store: Arc::new(Mutex::new(Store::default())),
        }
    }

    /// Members of a Redis Set, sorted.
    pub fn set_members(&self, set: &str) -> Vec<String> {
        let mut members: Vec<String> = self
            .lock()
            .sets
            .get(set)
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Raw stored string under a storage key, if present and not expired.
    pub fn raw_value(&self, key: &str) -> Option<String> {
        self.lock().get(key).as_str().map(str::to_string)
    }

    /// Time left before a storage key expires. `None` if it has no expiry or
    /// does not exist.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut store = self.lock();
        store.get(key);
        store
            .strings
            .get(key)
            .and_then(|stored| stored.expires_at)
            .map(|exp| exp.saturating_duration_since(Instant::now()))
    }

    /// Makes a storage key expire immediately, as if its TTL had elapsed.
    pub fn expire(&self, key: &str) {
        if let Some(stored) = self.lock().strings.get_mut(key) {
            stored.expires_at = Some(Instant::now());
        }
    }

    /// Overwrites a storage key with a raw string.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().set(key, value, None);
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let expected = format!("Bearer {}", self.token);
        if request.header("authorization") != Some(expected.as_str()) {
            return HttpResponse::new(401, r#"{"error":"Unauthorized"}"#);
        }

        let body: Value = match serde_json::from_str(&request.body) {
            Ok(body) => body,
            Err(_) => return HttpResponse::new(400, r#"{"error":"ERR failed to parse command"}"#),
        };

        let mut store = self.lock();
        if request.url.ends_with("/pipeline") {
            let Some(commands) = body.as_array() else {
                return HttpResponse::new(400, r#"{"error":"ERR pipeline must be an array"}"#);
            };
            let results: Vec<Value> = commands
                .iter()
                .map(|command| match command.as_array() {
                    Some(tokens) => store.execute(tokens),
                    None => error("ERR command must be an array"),
                })
                .collect();
            HttpResponse::new(200, Value::from(results).to_string())
        } else {
            match body.as_array() {
                Some(tokens) => HttpResponse::new(200, store.execute(tokens).to_string()),
                None => HttpResponse::new(400, r#"{"error":"ERR command must be an array"}"#),
            }
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.handle(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, token: &str, body: Value) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            headers: vec![("Authorization".to_string(), format!("Bearer {}", token))],
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_command() {
        let transport = MemoryTransport::new("t");
        let response = transport
            .post(request("https://x", "t", json!(["PING"])))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"result":"PONG"}"#);
    }

    #[tokio::test]
    async fn test_pipeline_set_get_sadd() {
        let transport = MemoryTransport::new("t");
        let response = transport
            .post(request(
                "https://x/pipeline",
                "t",
                json!([["SET", "k", "v"], ["GET", "k"], ["SADD", "s", "k"], ["SADD", "s", "k"]]),
            ))
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            body,
            json!([{"result": "OK"}, {"result": "v"}, {"result": 1}, {"result": 0}])
        );
        assert_eq!(transport.set_members("s"), vec!["k"]);
    }

    #[tokio::test]
    async fn test_wrong_token_is_unauthorized() {
        let transport = MemoryTransport::new("t");
        let response = transport
            .post(request("https://x", "wrong", json!(["PING"])))
            .await
            .unwrap();
        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error_element() {
        let transport = MemoryTransport::new("t");
        let response = transport
            .post(request("https://x", "t", json!(["FLUSHALL"])))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_del_and_srem_counts() {
        let transport = MemoryTransport::new("t");
        transport.insert_raw("a", "1");
        let response = transport
            .post(request(
                "https://x/pipeline",
                "t",
                json!([["SADD", "s", "a"], ["DEL", "a", "b"], ["SREM", "s", "a", "b"]]),
            ))
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body, json!([{"result": 1}, {"result": 1}, {"result": 1}]));
        assert!(transport.raw_value("a").is_none());
    }

    #[test]
    fn test_ttl_and_expire() {
        let transport = MemoryTransport::new("t");
        transport.lock().set("k", "v", Some(Duration::from_secs(60)));
        transport.insert_raw("forever", "v");

        let ttl = transport.ttl("k").unwrap();
        assert!(ttl > Duration::from_secs(58) && ttl <= Duration::from_secs(60));
        assert_eq!(transport.ttl("forever"), None);

        transport.expire("k");
        assert!(transport.raw_value("k").is_none());
    }

    #[test]
    fn test_expired_values_are_dropped_on_read() {
        let transport = MemoryTransport::new("t");
        transport.lock().strings.insert(
            "k".to_string(),
            StoredValue {
                value: "v".to_string(),
                expires_at: Some(Instant::now() - Duration::from_secs(1)),
            },
        );
        assert!(transport.raw_value("k").is_none());
    }
}
