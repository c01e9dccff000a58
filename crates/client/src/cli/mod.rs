//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

/// CLI client for cacheproxy.
#[derive(Debug, Parser)]
#[command(name = "cacheproxy")]
#[command(about = "Run cache operations against an external key-value store", long_about = None)]
pub struct Cli {
    /// JSON credential record. Falls back to environment variables.
    #[arg(long, env = "CACHEPROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "CACHEPROXY_TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the backend is alive.
    Ping,
    /// Read one value.
    Get { key: String },
    /// Read several values; missing keys are left out.
    GetAll {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Store one value. VALUE is parsed as JSON, otherwise taken as a string.
    Put {
        key: String,
        #[arg(value_parser = parse_value)]
        value: Value,
        /// Expiration in seconds; 0 disables the configured default.
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Store several KEY=VALUE entries in one request.
    PutAll {
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<(String, Value)>,
        /// Expiration in seconds applied to every entry.
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Delete one value.
    Remove { key: String },
    /// Delete several values.
    RemoveAll {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Parses a command-line value as JSON, falling back to a JSON string.
///
/// ```
/// use cacheproxy_client::cli::parse_value;
/// use serde_json::json;
///
/// assert_eq!(parse_value("42").unwrap(), json!(42));
/// assert_eq!(parse_value("hello").unwrap(), json!("hello"));
/// ```
pub fn parse_value(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Parses a `KEY=VALUE` pair. Only the first `=` separates key from value.
pub fn parse_entry(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), parse_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_json_types() {
        assert_eq!(parse_value("true").unwrap(), json!(true));
        assert_eq!(parse_value("null").unwrap(), Value::Null);
        assert_eq!(parse_value(r#"{"a":[1,2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(parse_value(r#""quoted""#).unwrap(), json!("quoted"));
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("bar").unwrap(), json!("bar"));
        assert_eq!(parse_value("{broken").unwrap(), json!("{broken"));
        assert_eq!(parse_value("").unwrap(), json!(""));
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("count=3").unwrap(),
            ("count".to_string(), json!(3))
        );
        assert_eq!(
            parse_entry("url=a=b").unwrap(),
            ("url".to_string(), json!("a=b"))
        );
        assert!(parse_entry("novalue").is_err());
        assert!(parse_entry("=1").is_err());
    }

    #[test]
    fn test_cli_parses_put_with_ttl() {
        let cli = Cli::try_parse_from(["cacheproxy", "put", "foo", "[1,2]", "--ttl", "30"]).unwrap();
        match cli.command {
            Commands::Put { key, value, ttl } => {
                assert_eq!(key, "foo");
                assert_eq!(value, json!([1, 2]));
                assert_eq!(ttl, Some(30));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.timeout, 30);
    }

    #[test]
    fn test_cli_parses_put_all() {
        let cli = Cli::try_parse_from([
            "cacheproxy",
            "--format",
            "json",
            "--timeout",
            "5",
            "put-all",
            "a=1",
            "b=two",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.timeout, 5);
        match cli.command {
            Commands::PutAll { entries, ttl } => {
                assert_eq!(
                    entries,
                    vec![
                        ("a".to_string(), json!(1)),
                        ("b".to_string(), json!("two"))
                    ]
                );
                assert_eq!(ttl, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_keys() {
        assert!(Cli::try_parse_from(["cacheproxy", "get-all"]).is_err());
        assert!(Cli::try_parse_from(["cacheproxy", "remove-all"]).is_err());
        assert!(Cli::try_parse_from(["cacheproxy", "put-all", "broken"]).is_err());
    }
}
