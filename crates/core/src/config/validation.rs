//! Pure validation of service configuration.

use url::Url;

use super::types::{
    BackendKind, Partition, ResolvedConfig, ServiceConfig, DEFAULT_CACHE_ID, DEFAULT_PREFIX,
    DEFAULT_SCRIPT_ID, DEFAULT_USER_ID,
};
use crate::error::{CacheProxyError, Result};

/// Validates a service configuration and applies every default.
///
/// Checks run in a fixed order: `name` must be a non-empty registered backend
/// name, then each partition field that is present must be non-empty. An
/// empty JSON record is rejected earlier, by [`ServiceConfig::from_value`].
/// The backend-specific `url` and `token` are checked by the backend client
/// itself.
///
/// # Examples
///
/// ```
/// use cacheproxy_core::config::{resolve, BackendKind, ServiceConfig};
///
/// let resolved = resolve(&ServiceConfig::new("upstash").with_prefix("app")).unwrap();
/// assert_eq!(resolved.backend, BackendKind::Upstash);
/// assert_eq!(resolved.partition.prefix, "app");
/// assert_eq!(resolved.partition.cache_id, "c");
///
/// assert!(resolve(&ServiceConfig::new("memcached")).is_err());
/// ```
pub fn resolve(config: &ServiceConfig) -> Result<ResolvedConfig> {
    let name = match config.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(CacheProxyError::Configuration(
                "external service name must be a non-empty string".to_string(),
            ))
        }
    };
    let backend: BackendKind = name.parse()?;

    let partition = Partition {
        script_id: optional_component("scriptId", config.script_id.as_deref())?
            .unwrap_or(DEFAULT_SCRIPT_ID)
            .to_string(),
        user_id: optional_component("userId", config.user_id.as_deref())?
            .unwrap_or(DEFAULT_USER_ID)
            .to_string(),
        cache_id: optional_component("cacheId", config.cache_id.as_deref())?
            .unwrap_or(DEFAULT_CACHE_ID)
            .to_string(),
        prefix: optional_component("prefix", config.prefix.as_deref())?
            .unwrap_or(DEFAULT_PREFIX)
            .to_string(),
    };

    Ok(ResolvedConfig {
        backend,
        url: config.url.clone(),
        token: config.token.clone(),
        partition,
        default_expiration_seconds: config.default_expiration_seconds,
    })
}

/// Absent is fine, empty is not.
fn optional_component<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>> {
    match value {
        Some("") => Err(CacheProxyError::Configuration(format!(
            "{} must be a non-empty string when present",
            field
        ))),
        other => Ok(other),
    }
}

/// Requires a well-formed absolute URL.
pub fn validate_url(url: Option<&str>) -> Result<Url> {
    let url = url.ok_or_else(|| {
        CacheProxyError::Configuration("url is required by this service".to_string())
    })?;
    Url::parse(url)
        .map_err(|e| CacheProxyError::Configuration(format!("invalid url {}: {}", url, e)))
}

/// Requires a non-empty bearer token.
pub fn validate_token(token: Option<&str>) -> Result<&str> {
    match token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(CacheProxyError::Configuration(
            "token must be a non-empty string".to_string(),
        )),
    }
}
