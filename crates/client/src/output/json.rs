//! JSON output formatting.

use serde_json::json;

use crate::commands::CommandOutput;

/// One JSON document per command, tagged with the command name.
pub fn format_json(output: &CommandOutput) -> String {
    serde_json::to_string(output)
        .unwrap_or_else(|err| json!({ "error": err.to_string() }).to_string())
}
