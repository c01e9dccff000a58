//! Upstash Redis REST backend.
//!
//! Every entry is stored under `{partition}-{key}` and its storage key is
//! tracked in the partition's Redis Set, so the whole partition can be
//! enumerated or cleared without SCAN. Multi-command operations are sent as a
//! single pipeline request.
//!
//! See <https://upstash.com/docs/redis/features/restapi>.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use cacheproxy_core::cache::{
    decode_stored, make_cache_key, partition_key, serialize_entry, CacheClient, CacheKey,
    PutOutcome,
};
use cacheproxy_core::config::{validate_token, validate_url, Partition, ResolvedConfig};
use cacheproxy_core::protocol::{
    check_result, expect_result_count, Command, CommandResult, HttpRequest, Request, Transport,
};
use cacheproxy_core::{CacheProxyError, Result};

/// Liveness token returned by `PING`.
const PONG: &str = "PONG";

/// Cache client for the Upstash REST API.
pub struct UpstashClient {
    url: String,
    token: String,
    partition: Partition,
    default_expiration_seconds: Option<u64>,
    transport: Arc<dyn Transport>,
}

impl UpstashClient {
    /// Creates a client bound to a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `CacheProxyError::Configuration` if `url` is not a well-formed
    /// URL or `token` is missing or empty.
    pub fn new(config: &ResolvedConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        validate_url(config.url.as_deref())?;
        let token = validate_token(config.token.as_deref())?;
        Ok(Self {
            url: config.url.clone().unwrap_or_default(),
            token: token.to_string(),
            partition: config.partition.clone(),
            default_expiration_seconds: config.default_expiration_seconds,
            transport,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Derives the storage keys for a logical key.
    pub fn make_cache_key(&self, key: &str) -> CacheKey {
        make_cache_key(&self.partition, key)
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    /// Explicit expiration wins over the default; zero means none.
    fn expiration(&self, explicit: Option<u64>) -> Option<u64> {
        explicit
            .or(self.default_expiration_seconds)
            .filter(|seconds| *seconds > 0)
    }

    /// Sends one request. The reply must hold one result per command.
    async fn request(&self, request: Request) -> Result<Vec<CommandResult>> {
        let body = request.to_body()?;
        let url = request.endpoint(&self.url);
        tracing::debug!(url = %url, body = %body, "Sending request to upstash");

        let response = self
            .transport
            .post(HttpRequest {
                url,
                headers: self.headers(),
                body,
            })
            .await?;
        let results = check_result(&response)?;
        expect_result_count(&results, request.len())?;
        Ok(results)
    }
}

#[async_trait]
impl CacheClient for UpstashClient {
    async fn ping(&self) -> Result<String> {
        let results = self.request(Request::Single(Command::ping())).await?;

        match &results[0].result {
            Value::String(token) if token == PONG => Ok(token.clone()),
            other => Err(CacheProxyError::Liveness(format!(
                "failed to get {} from upstash - got {}",
                PONG, other
            ))),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let CacheKey { cache_key, .. } = self.make_cache_key(key);
        let results = self.request(Request::Single(Command::get(&cache_key))).await?;
        decode_stored(key, &results[0].result)
    }

    async fn get_all(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let commands = keys
            .iter()
            .map(|key| Command::get(&self.make_cache_key(key).cache_key))
            .collect();
        let results = self.request(Request::Pipeline(commands)).await?;

        let mut values = HashMap::with_capacity(keys.len());
        for (key, result) in keys.iter().zip(&results) {
            if let Some(value) = decode_stored(key, &result.result)? {
                values.insert(key.clone(), value);
            }
        }
        Ok(values)
    }

    async fn put(
        &self,
        key: &str,
        value: &Value,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome> {
        let CacheKey {
            redis_set,
            cache_key,
        } = self.make_cache_key(key);
        let payload = serialize_entry(key, value)?;

        let request = Request::Pipeline(vec![
            Command::set(&cache_key, payload, self.expiration(expiration_in_seconds)),
            Command::sadd(&redis_set, [cache_key.as_str()]),
        ]);
        let results = self.request(request).await?;

        let stored = results[0].is_ok() && results[1].as_i64() == Some(1);
        if stored {
            Ok(PutOutcome::Stored)
        } else {
            tracing::warn!(key, ?results, "Unexpected acknowledgement for put");
            Ok(PutOutcome::Unexpected(results))
        }
    }

    async fn put_all(
        &self,
        entries: &HashMap<String, Value>,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome> {
        if entries.is_empty() {
            return Ok(PutOutcome::Stored);
        }

        // Sorted so the wire order does not depend on hash order.
        let mut sorted: Vec<(&String, &Value)> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let expiration = self.expiration(expiration_in_seconds);
        let mut cache_keys = Vec::with_capacity(sorted.len());
        let mut commands = Vec::with_capacity(sorted.len() + 1);
        for (key, value) in sorted {
            let CacheKey { cache_key, .. } = self.make_cache_key(key);
            commands.push(Command::set(
                &cache_key,
                serialize_entry(key, value)?,
                expiration,
            ));
            cache_keys.push(cache_key);
        }
        commands.push(Command::sadd(
            &partition_key(&self.partition),
            cache_keys.iter().map(String::as_str),
        ));

        let count = cache_keys.len();
        let results = self.request(Request::Pipeline(commands)).await?;

        let stored = results[..count].iter().all(CommandResult::is_ok)
            && results[count].as_i64() == i64::try_from(count).ok();
        if stored {
            Ok(PutOutcome::Stored)
        } else {
            tracing::warn!(count, ?results, "Unexpected acknowledgement for put_all");
            Ok(PutOutcome::Unexpected(results))
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let CacheKey {
            redis_set,
            cache_key,
        } = self.make_cache_key(key);

        let request = Request::Pipeline(vec![
            Command::del([cache_key.as_str()]),
            Command::srem(&redis_set, [cache_key.as_str()]),
        ]);
        self.request(request).await?;
        Ok(())
    }

    async fn remove_all(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let cache_keys: Vec<String> = keys
            .iter()
            .map(|key| self.make_cache_key(key).cache_key)
            .collect();

        let request = Request::Pipeline(vec![
            Command::del(cache_keys.iter().map(String::as_str)),
            Command::srem(
                &partition_key(&self.partition),
                cache_keys.iter().map(String::as_str),
            ),
        ]);
        self.request(request).await?;
        Ok(())
    }
}
