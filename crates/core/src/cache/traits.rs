use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::PutOutcome;
use crate::error::Result;

/// Cache operations every backend client provides.
///
/// Expirations are whole seconds. `None` falls back to the configured
/// default, and zero means the entry never expires.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Liveness probe. Returns the backend's liveness token.
    async fn ping(&self) -> Result<String>;

    /// Gets a value by key. `None` means no entry.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Gets several values in one round trip. Missing keys are left out.
    async fn get_all(&self, keys: &[String]) -> Result<HashMap<String, Value>>;

    /// Stores a value with an optional expiration.
    async fn put(
        &self,
        key: &str,
        value: &Value,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome>;

    /// Stores several values in one round trip, all with the same expiration.
    async fn put_all(
        &self,
        entries: &HashMap<String, Value>,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome>;

    /// Removes an entry and its partition membership.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Removes several entries in one round trip.
    async fn remove_all(&self, keys: &[String]) -> Result<()>;
}
