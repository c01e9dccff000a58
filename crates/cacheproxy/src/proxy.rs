//! The cache façade.
//!
//! `CacheProxy` validates the service configuration, instantiates the backend
//! client it names, probes it, and then forwards every cache call verbatim.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use cacheproxy_core::cache::{partition_key, CacheClient, PutOutcome};
use cacheproxy_core::config::{resolve, Partition, ResolvedConfig, ServiceConfig};
use cacheproxy_core::protocol::Transport;
use cacheproxy_core::{CacheProxyError, Result};

use crate::backends::create_client;
use crate::transport::ReqwestTransport;

/// Backend-agnostic cache bound to one partition of an external store.
pub struct CacheProxy {
    config: ResolvedConfig,
    host_service: Value,
    client: Box<dyn CacheClient>,
}

impl fmt::Debug for CacheProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheProxy")
            .field("name", &self.name())
            .field("partition", &partition_key(&self.config.partition))
            .field(
                "default_expiration_seconds",
                &self.config.default_expiration_seconds,
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`CacheProxy`].
pub struct CacheProxyBuilder {
    config: ServiceConfig,
    host_service: Option<Value>,
    transport: Option<Arc<dyn Transport>>,
}

impl CacheProxyBuilder {
    /// Opaque reference to the platform cache being emulated.
    pub fn host_service(mut self, host_service: Value) -> Self {
        self.host_service = Some(host_service);
        self
    }

    /// Uses a custom transport instead of the default reqwest client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validates the configuration, creates the backend client and probes it.
    ///
    /// # Errors
    ///
    /// - `CacheProxyError::Configuration` for an invalid configuration or an
    ///   unsupported backend name
    /// - `CacheProxyError::Liveness` if the backend answers the probe wrongly
    /// - any transport or protocol error raised by the probe itself
    pub async fn connect(self) -> Result<CacheProxy> {
        let config = resolve(&self.config)?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        let client = create_client(&config, transport)?;
        client.ping().await?;

        tracing::info!(
            service = %config.backend,
            partition = %partition_key(&config.partition),
            "Connected to cache backend"
        );

        Ok(CacheProxy {
            config,
            host_service: self
                .host_service
                .unwrap_or_else(|| Value::Object(Default::default())),
            client,
        })
    }
}

impl CacheProxy {
    /// Connects using the reqwest transport.
    pub async fn connect(config: ServiceConfig) -> Result<Self> {
        Self::builder(config).connect().await
    }

    pub fn builder(config: ServiceConfig) -> CacheProxyBuilder {
        CacheProxyBuilder {
            config,
            host_service: None,
            transport: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.config.backend.as_str()
    }

    pub fn script_id(&self) -> &str {
        &self.config.partition.script_id
    }

    pub fn cache_id(&self) -> &str {
        &self.config.partition.cache_id
    }

    pub fn user_id(&self) -> &str {
        &self.config.partition.user_id
    }

    pub fn prefix(&self) -> &str {
        &self.config.partition.prefix
    }

    /// `None` means entries never expire unless `put` says otherwise.
    pub fn default_expiration_seconds(&self) -> Option<u64> {
        self.config.default_expiration_seconds
    }

    pub fn partition(&self) -> &Partition {
        &self.config.partition
    }

    pub fn host_service(&self) -> &Value {
        &self.host_service
    }

    /// Probes the backend again; the reply is its liveness token.
    pub async fn ping(&self) -> Result<String> {
        self.client.ping().await
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.client.get(key).await
    }

    pub async fn get_all(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        self.client.get_all(keys).await
    }

    pub async fn put(
        &self,
        key: &str,
        value: &Value,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome> {
        self.client.put(key, value, expiration_in_seconds).await
    }

    pub async fn put_all(
        &self,
        entries: &HashMap<String, Value>,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome> {
        self.client.put_all(entries, expiration_in_seconds).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.client.remove(key).await
    }

    pub async fn remove_all(&self, keys: &[String]) -> Result<()> {
        self.client.remove_all(keys).await
    }

    /// Gets a value and deserializes it into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(CacheProxyError::from),
            None => Ok(None),
        }
    }

    /// Serializes `value` to JSON and stores it.
    pub async fn put_serialized<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expiration_in_seconds: Option<u64>,
    ) -> Result<PutOutcome> {
        let value = serde_json::to_value(value)?;
        self.put(key, &value, expiration_in_seconds).await
    }
}
