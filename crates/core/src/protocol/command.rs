//! Redis commands and the REST requests that carry them.

use serde::Serialize;
use serde_json::Value;

use crate::error::{CacheProxyError, Result};

/// A single Redis command as an ordered list of tokens.
///
/// Serializes as a JSON array, e.g. `["GET","p:c:s:u-foo"]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Command(Vec<Value>);

impl Command {
    /// Starts a command with its verb.
    pub fn new(verb: &str) -> Self {
        Self(vec![Value::from(verb)])
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.0.push(arg.into());
        self
    }

    /// Appends every argument in order.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.0.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn tokens(&self) -> &[Value] {
        &self.0
    }

    pub fn ping() -> Self {
        Self::new("PING")
    }

    pub fn get(key: &str) -> Self {
        Self::new("GET").arg(key)
    }

    /// `SET key payload [EX seconds]`. A zero or absent TTL adds no `EX` clause.
    pub fn set(key: &str, payload: String, expiration_in_seconds: Option<u64>) -> Self {
        let command = Self::new("SET").arg(key).arg(payload);
        match expiration_in_seconds {
            Some(seconds) if seconds > 0 => command.arg("EX").arg(seconds),
            _ => command,
        }
    }

    pub fn sadd<'a>(set: &str, members: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new("SADD").arg(set).args(members)
    }

    pub fn srem<'a>(set: &str, members: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new("SREM").arg(set).args(members)
    }

    pub fn del<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new("DEL").args(keys)
    }
}

/// A REST request: one command, or a pipeline of commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Sent to the base endpoint.
    Single(Command),
    /// Sent to `{url}/pipeline`; results come back index-aligned.
    Pipeline(Vec<Command>),
}

impl Request {
    /// Number of results the backend should return.
    pub fn len(&self) -> usize {
        match self {
            Request::Single(_) => 1,
            Request::Pipeline(commands) => commands.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Endpoint for this request relative to the backend base URL.
    pub fn endpoint(&self, base_url: &str) -> String {
        match self {
            Request::Single(_) => base_url.to_string(),
            Request::Pipeline(_) => format!("{}/pipeline", base_url.trim_end_matches('/')),
        }
    }

    /// JSON body for this request.
    ///
    /// Fails with [`CacheProxyError::Precondition`] for an empty pipeline.
    pub fn to_body(&self) -> Result<String> {
        if self.is_empty() {
            return Err(CacheProxyError::Precondition(
                "pipeline must contain at least one command".to_string(),
            ));
        }
        let body = match self {
            Request::Single(command) => serde_json::to_string(command)?,
            Request::Pipeline(commands) => serde_json::to_string(commands)?,
        };
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_command_body() {
        let body = Request::Single(Command::get("p:c:s:u-foo")).to_body().unwrap();
        assert_eq!(body, r#"["GET","p:c:s:u-foo"]"#);
    }

    #[test]
    fn test_ping_command() {
        let command = Command::ping();
        assert_eq!(command.tokens(), &[json!("PING")]);
    }

    #[test]
    fn test_set_without_expiration() {
        let command = Command::set("k", "payload".to_string(), None);
        assert_eq!(command.tokens(), &[json!("SET"), json!("k"), json!("payload")]);
    }

    #[test]
    fn test_set_with_expiration_appends_ex_clause() {
        let command = Command::set("k", "payload".to_string(), Some(60));
        assert_eq!(
            command.tokens(),
            &[json!("SET"), json!("k"), json!("payload"), json!("EX"), json!(60)]
        );
    }

    #[test]
    fn test_set_with_zero_expiration_omits_ex_clause() {
        let command = Command::set("k", "payload".to_string(), Some(0));
        assert_eq!(command.tokens().len(), 3);
    }

    #[test]
    fn test_multi_member_commands() {
        let sadd = Command::sadd("set", ["a", "b"]);
        assert_eq!(sadd.tokens(), &[json!("SADD"), json!("set"), json!("a"), json!("b")]);

        let srem = Command::srem("set", ["a"]);
        assert_eq!(srem.tokens(), &[json!("SREM"), json!("set"), json!("a")]);

        let del = Command::del(["a", "b"]);
        assert_eq!(del.tokens(), &[json!("DEL"), json!("a"), json!("b")]);
    }

    #[test]
    fn test_pipeline_body() {
        let request = Request::Pipeline(vec![Command::get("a"), Command::get("b")]);
        assert_eq!(request.to_body().unwrap(), r#"[["GET","a"],["GET","b"]]"#);
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn test_endpoints() {
        let single = Request::Single(Command::ping());
        let pipeline = Request::Pipeline(vec![Command::ping()]);

        assert_eq!(single.endpoint("https://x.upstash.io"), "https://x.upstash.io");
        assert_eq!(
            pipeline.endpoint("https://x.upstash.io"),
            "https://x.upstash.io/pipeline"
        );
        assert_eq!(
            pipeline.endpoint("https://x.upstash.io/"),
            "https://x.upstash.io/pipeline"
        );
    }

    #[test]
    fn test_empty_pipeline_is_precondition_error() {
        let request = Request::Pipeline(vec![]);
        assert!(request.is_empty());
        assert!(matches!(
            request.to_body(),
            Err(CacheProxyError::Precondition(_))
        ));
    }
}
