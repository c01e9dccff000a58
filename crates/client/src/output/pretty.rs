//! Pretty output formatting.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::commands::CommandOutput;

/// Format a single JSON value for display.
pub fn format_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Format a set of found values for display.
pub fn format_values(values: &BTreeMap<String, Value>) -> String {
    if values.is_empty() {
        return "No values found.".to_string();
    }
    let mut output = format!("VALUES ({})\n", values.len());
    output.push_str(&"-".repeat(40));
    for (key, value) in values {
        output.push_str(&format!("\n{}: {}", key, format_value(value)));
    }
    output
}

/// Format a command result. Confirmation messages are dropped when `quiet`.
pub fn format_pretty(output: &CommandOutput, quiet: bool) -> Option<String> {
    match output {
        CommandOutput::Ping { reply } => Some(reply.clone()),
        CommandOutput::Get {
            key, value: None, ..
        } => (!quiet).then(|| format!("No value for {}", key)),
        CommandOutput::Get {
            value: Some(value), ..
        } => Some(format_value(value)),
        CommandOutput::GetAll { values } => Some(format_values(values)),
        CommandOutput::Put { keys, stored: true } => {
            (!quiet).then(|| format!("Stored {}", keys.join(", ")))
        }
        CommandOutput::Put {
            keys,
            stored: false,
        } => Some(format!(
            "Stored {} with an unexpected acknowledgement",
            keys.join(", ")
        )),
        CommandOutput::Remove { keys } => (!quiet).then(|| format!("Removed {}", keys.join(", "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_get() {
        let found = CommandOutput::Get {
            key: "k".to_string(),
            found: true,
            value: Some(json!("bar")),
        };
        assert_eq!(format_pretty(&found, false).as_deref(), Some("\"bar\""));

        let missing = CommandOutput::Get {
            key: "k".to_string(),
            found: false,
            value: None,
        };
        assert_eq!(format_pretty(&missing, false).as_deref(), Some("No value for k"));
        assert_eq!(format_pretty(&missing, true), None);
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&BTreeMap::new()), "No values found.");

        let values = BTreeMap::from([("a".to_string(), json!(1))]);
        let output = format_values(&values);
        assert!(output.starts_with("VALUES (1)"));
        assert!(output.ends_with("a: 1"));
    }

    #[test]
    fn test_quiet_suppresses_confirmations_only() {
        let stored = CommandOutput::Put {
            keys: vec!["a".to_string(), "b".to_string()],
            stored: true,
        };
        assert_eq!(format_pretty(&stored, false).as_deref(), Some("Stored a, b"));
        assert_eq!(format_pretty(&stored, true), None);

        let unexpected = CommandOutput::Put {
            keys: vec!["a".to_string()],
            stored: false,
        };
        assert!(format_pretty(&unexpected, true).is_some());

        let removed = CommandOutput::Remove {
            keys: vec!["a".to_string()],
        };
        assert_eq!(format_pretty(&removed, true), None);
    }
}
