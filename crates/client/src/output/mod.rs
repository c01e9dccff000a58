//! Output formatting functions.

pub mod json;
pub mod pretty;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;

/// Format a command result for output. `None` means nothing should be printed.
pub fn format_output(output: &CommandOutput, format: OutputFormat, quiet: bool) -> Option<String> {
    match format {
        OutputFormat::Json => Some(json::format_json(output)),
        OutputFormat::Pretty => pretty::format_pretty(output, quiet),
    }
}
