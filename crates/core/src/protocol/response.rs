//! Validation of REST responses into typed command results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheProxyError, Result};

/// Raw HTTP response as returned by a [`super::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One validated `{"result": ...}` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub result: Value,
}

impl CommandResult {
    pub fn new(result: Value) -> Self {
        Self { result }
    }

    /// True for the `OK` acknowledgement of a write.
    pub fn is_ok(&self) -> bool {
        self.result == "OK"
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.result.as_i64()
    }
}

/// Validates a backend response.
///
/// - a non-200 status is a [`CacheProxyError::Transport`] carrying the body;
/// - a single object is treated as a one-element sequence;
/// - every element must be a non-empty object with a `result` field.
///
/// The returned results are index-aligned with the submitted commands.
pub fn check_result(response: &HttpResponse) -> Result<Vec<CommandResult>> {
    if response.status != 200 {
        return Err(CacheProxyError::Transport {
            status: response.status,
            body: response.body.clone(),
        });
    }

    let parsed: Value = serde_json::from_str(&response.body).map_err(|e| {
        CacheProxyError::Protocol(format!("response is not JSON ({}): {}", e, response.body))
    })?;

    let items = match parsed {
        Value::Array(items) => items,
        other => vec![other],
    };

    items.into_iter().map(validate_item).collect()
}

fn validate_item(item: Value) -> Result<CommandResult> {
    match item {
        Value::Object(mut map) => match map.remove("result") {
            Some(result) => Ok(CommandResult { result }),
            None => Err(unexpected(&Value::Object(map))),
        },
        other => Err(unexpected(&other)),
    }
}

fn unexpected(item: &Value) -> CacheProxyError {
    CacheProxyError::Protocol(format!("expected a result from backend, but got {}", item))
}

/// Requires exactly `expected` results.
pub fn expect_result_count(results: &[CommandResult], expected: usize) -> Result<()> {
    if results.len() != expected {
        return Err(CacheProxyError::Protocol(format!(
            "expected {} results from backend, but got {}",
            expected,
            results.len()
        )));
    }
    Ok(())
}
