//! Pure functions for encoding cache values into stored payloads and back.
//!
//! The payload is a JSON object carrying the logical key next to the value,
//! so a read can detect that it received somebody else's entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheProxyError, Result};

/// A cache entry as stored in the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Stored value. A payload without `value` decodes as `null`.
    #[serde(default)]
    pub value: Value,
    pub key: String,
}

/// Serializes a value and its logical key into the stored payload.
///
/// # Examples
///
/// ```
/// use cacheproxy_core::cache::serialize_entry;
/// use serde_json::json;
///
/// let payload = serialize_entry("foo", &json!("bar")).unwrap();
/// assert_eq!(payload, r#"{"value":"bar","key":"foo"}"#);
/// ```
pub fn serialize_entry(key: &str, value: &Value) -> Result<String> {
    let entry = CacheEntry {
        value: value.clone(),
        key: key.to_string(),
    };
    serde_json::to_string(&entry).map_err(CacheProxyError::from)
}

/// Placeholder reported when a stored payload carries no logical key.
const MISSING_KEY: &str = "<missing>";

/// Decodes the `result` of a read command for the requested key.
///
/// Returns `None` when the backend has no entry. Fails with
/// [`CacheProxyError::DataIntegrity`] if the payload's embedded key is absent
/// or differs from `requested_key`.
pub fn decode_stored(requested_key: &str, result: &Value) -> Result<Option<Value>> {
    let payload = match result {
        Value::Null => return Ok(None),
        Value::String(payload) => payload,
        other => {
            return Err(CacheProxyError::Protocol(format!(
                "expected a stored string payload, but got {}",
                other
            )))
        }
    };

    let mut entry = match serde_json::from_str::<Value>(payload)? {
        Value::Object(map) => map,
        _ => return Err(integrity_error(requested_key, MISSING_KEY.to_string())),
    };

    match entry.get("key") {
        Some(Value::String(key)) if key == requested_key => {}
        Some(Value::String(key)) => return Err(integrity_error(requested_key, key.clone())),
        Some(other) => return Err(integrity_error(requested_key, other.to_string())),
        None => return Err(integrity_error(requested_key, MISSING_KEY.to_string())),
    }
    Ok(Some(entry.remove("value").unwrap_or(Value::Null)))
}

fn integrity_error(expected: &str, actual: String) -> CacheProxyError {
    CacheProxyError::DataIntegrity {
        expected: expected.to_string(),
        actual,
    }
}
