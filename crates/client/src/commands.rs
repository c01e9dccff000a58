//! Executes one CLI command against a connected cache.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use cacheproxy::{CacheProxy, PutOutcome, ServiceConfig};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Commands;
use crate::error::{ClientError, Result};

/// Reads the credential record from `path`, or the environment when absent.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigFile {
                path: path.display().to_string(),
                source,
            })?;
            Ok(ServiceConfig::from_json_str(&contents)?)
        }
        None => Ok(ServiceConfig::from_env()?),
    }
}

/// Result of a command, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CommandOutput {
    Ping {
        reply: String,
    },
    Get {
        key: String,
        found: bool,
        value: Option<Value>,
    },
    GetAll {
        values: BTreeMap<String, Value>,
    },
    Put {
        keys: Vec<String>,
        stored: bool,
    },
    Remove {
        keys: Vec<String>,
    },
}

fn put_output(keys: Vec<String>, outcome: PutOutcome) -> CommandOutput {
    CommandOutput::Put {
        keys,
        stored: outcome.is_stored(),
    }
}

/// Runs `command` and collects its output.
pub async fn run(cache: &CacheProxy, command: Commands) -> Result<CommandOutput> {
    let output = match command {
        Commands::Ping => CommandOutput::Ping {
            reply: cache.ping().await?,
        },
        Commands::Get { key } => {
            let value = cache.get(&key).await?;
            CommandOutput::Get {
                found: value.is_some(),
                key,
                value,
            }
        }
        Commands::GetAll { keys } => {
            let values = cache.get_all(&keys).await?;
            CommandOutput::GetAll {
                values: values.into_iter().collect(),
            }
        }
        Commands::Put { key, value, ttl } => {
            let outcome = cache.put(&key, &value, ttl).await?;
            put_output(vec![key], outcome)
        }
        Commands::PutAll { entries, ttl } => {
            let entries: HashMap<String, Value> = entries.into_iter().collect();
            let outcome = cache.put_all(&entries, ttl).await?;
            let mut keys: Vec<String> = entries.into_keys().collect();
            keys.sort();
            put_output(keys, outcome)
        }
        Commands::Remove { key } => {
            cache.remove(&key).await?;
            CommandOutput::Remove { keys: vec![key] }
        }
        Commands::RemoveAll { keys } => {
            cache.remove_all(&keys).await?;
            CommandOutput::Remove { keys }
        }
    };

    tracing::debug!(?output, "Command finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheproxy::transport::MemoryTransport;
    use cacheproxy::CacheProxyError;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    async fn cache() -> CacheProxy {
        let config = ServiceConfig::new("upstash")
            .with_url("https://example.upstash.io")
            .with_token("t");
        CacheProxy::builder(config)
            .transport(MemoryTransport::new("t"))
            .connect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = cache().await;
        let put = run(
            &cache,
            Commands::Put {
                key: "foo".to_string(),
                value: json!("bar"),
                ttl: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            put,
            CommandOutput::Put {
                keys: vec!["foo".to_string()],
                stored: true
            }
        );

        let get = run(&cache, Commands::Get { key: "foo".to_string() })
            .await
            .unwrap();
        assert_eq!(
            get,
            CommandOutput::Get {
                key: "foo".to_string(),
                found: true,
                value: Some(json!("bar"))
            }
        );
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = cache().await;
        let get = run(&cache, Commands::Get { key: "nope".to_string() })
            .await
            .unwrap();
        assert_eq!(
            get,
            CommandOutput::Get {
                key: "nope".to_string(),
                found: false,
                value: None
            }
        );
    }

    #[tokio::test]
    async fn test_put_all_get_all_remove_all() {
        let cache = cache().await;
        let put = run(
            &cache,
            Commands::PutAll {
                entries: vec![
                    ("b".to_string(), json!(2)),
                    ("a".to_string(), json!(1)),
                ],
                ttl: Some(60),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            put,
            CommandOutput::Put {
                keys: vec!["a".to_string(), "b".to_string()],
                stored: true
            }
        );

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let all = run(&cache, Commands::GetAll { keys: keys.clone() })
            .await
            .unwrap();
        assert_eq!(
            all,
            CommandOutput::GetAll {
                values: BTreeMap::from([
                    ("a".to_string(), json!(1)),
                    ("b".to_string(), json!(2))
                ])
            }
        );

        run(&cache, Commands::RemoveAll { keys: keys.clone() })
            .await
            .unwrap();
        let all = run(&cache, Commands::GetAll { keys }).await.unwrap();
        assert_eq!(
            all,
            CommandOutput::GetAll {
                values: BTreeMap::new()
            }
        );
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"upstash","url":"https://x.upstash.io","token":"t","userId":"alice"}}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(
            config,
            ServiceConfig::new("upstash")
                .with_url("https://x.upstash.io")
                .with_token("t")
                .with_user_id("alice")
        );
    }

    #[test]
    fn test_load_config_invalid_record() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(
            result,
            Err(ClientError::Cache(CacheProxyError::Configuration(_)))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/cacheproxy.json")));
        assert!(matches!(result, Err(ClientError::ConfigFile { .. })));
    }

    #[test]
    fn test_output_serializes_with_command_tag() {
        let output = CommandOutput::Remove {
            keys: vec!["a".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({"command": "remove", "keys": ["a"]})
        );
    }
}
