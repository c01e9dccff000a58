//! cacheproxy_client - CLI client for cacheproxy.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use commands::{load_config, run, CommandOutput};
pub use error::{ClientError, Result};
