use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CacheProxyError, Result};

/// Default partition components used when a field is absent.
pub const DEFAULT_PREFIX: &str = "p";
pub const DEFAULT_CACHE_ID: &str = "c";
pub const DEFAULT_SCRIPT_ID: &str = "s";
pub const DEFAULT_USER_ID: &str = "u";

/// Backends the proxy knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Upstash Redis REST API.
    Upstash,
}

impl BackendKind {
    /// Every registered backend, in registration order.
    pub const ALL: &'static [BackendKind] = &[BackendKind::Upstash];

    /// The configuration name selecting this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Upstash => "upstash",
        }
    }

    /// Comma separated list of every supported backend name.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(BackendKind::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = CacheProxyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CacheProxyError::Configuration(format!(
                    "unsupported service {} not in {}",
                    s,
                    Self::supported_names()
                ))
            })
    }
}

/// External service configuration as supplied by the caller.
///
/// Mirrors the credential record stored alongside the host application.
/// Nothing here is validated; see [`crate::config::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Backend name. Credential records written by older tooling call this `type`.
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expiration_seconds: Option<u64>,
}

impl ServiceConfig {
    /// Create a configuration selecting the named backend.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_script_id(mut self, script_id: impl Into<String>) -> Self {
        self.script_id = Some(script_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_cache_id(mut self, cache_id: impl Into<String>) -> Self {
        self.cache_id = Some(cache_id.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_default_expiration_seconds(mut self, seconds: u64) -> Self {
        self.default_expiration_seconds = Some(seconds);
        self
    }

    /// Load a configuration from a JSON credential record.
    ///
    /// The record must be a non-empty JSON object. Fields of the wrong JSON
    /// type are reported as configuration errors.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        match value.as_object() {
            Some(map) if !map.is_empty() => {}
            _ => {
                return Err(CacheProxyError::Configuration(
                    "external service must be a non-empty object".to_string(),
                ))
            }
        }
        serde_json::from_value(value.clone())
            .map_err(|e| CacheProxyError::Configuration(e.to_string()))
    }

    /// Load a configuration from a JSON credential string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CacheProxyError::Configuration(format!("invalid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHEPROXY_SERVICE` - Backend name (default: "upstash")
    /// - `UPSTASH_REDIS_REST_URL` - REST endpoint
    /// - `UPSTASH_REDIS_REST_TOKEN` - Bearer token
    /// - `CACHEPROXY_SCRIPT_ID`, `CACHEPROXY_USER_ID`, `CACHEPROXY_CACHE_ID`,
    ///   `CACHEPROXY_PREFIX` - Partition components
    /// - `CACHEPROXY_DEFAULT_EXPIRATION_SECONDS` - Default TTL for `put`
    ///
    /// # Errors
    ///
    /// Returns `CacheProxyError::Configuration` if the default TTL is not a
    /// whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            name: Some(env::var("CACHEPROXY_SERVICE").unwrap_or_else(|_| "upstash".to_string())),
            url: env::var("UPSTASH_REDIS_REST_URL").ok(),
            token: env::var("UPSTASH_REDIS_REST_TOKEN").ok(),
            script_id: env::var("CACHEPROXY_SCRIPT_ID").ok(),
            user_id: env::var("CACHEPROXY_USER_ID").ok(),
            cache_id: env::var("CACHEPROXY_CACHE_ID").ok(),
            prefix: env::var("CACHEPROXY_PREFIX").ok(),
            default_expiration_seconds: parse_expiration(
                env::var("CACHEPROXY_DEFAULT_EXPIRATION_SECONDS").ok(),
            )?,
        })
    }
}

fn parse_expiration(raw: Option<String>) -> Result<Option<u64>> {
    raw.map(|v| {
        v.trim().parse().map_err(|_| {
            CacheProxyError::Configuration(format!(
                "CACHEPROXY_DEFAULT_EXPIRATION_SECONDS must be whole seconds: {}",
                v
            ))
        })
    })
    .transpose()
}

/// The four components that namespace every entry in the shared store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    pub prefix: String,
    pub cache_id: String,
    pub script_id: String,
    pub user_id: String,
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            cache_id: DEFAULT_CACHE_ID.to_string(),
            script_id: DEFAULT_SCRIPT_ID.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// Validated configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub backend: BackendKind,
    pub url: Option<String>,
    pub token: Option<String>,
    pub partition: Partition,
    pub default_expiration_seconds: Option<u64>,
}
