//! Backend client registry.
//!
//! Each [`BackendKind`] maps to exactly one constructor. Adding a backend
//! means adding a variant in `cacheproxy_core::config` and an arm here.

mod upstash;

use std::sync::Arc;

use cacheproxy_core::cache::CacheClient;
use cacheproxy_core::config::{BackendKind, ResolvedConfig};
use cacheproxy_core::protocol::Transport;
use cacheproxy_core::Result;

pub use upstash::UpstashClient;

/// Creates the client for the configured backend.
pub fn create_client(
    config: &ResolvedConfig,
    transport: Arc<dyn Transport>,
) -> Result<Box<dyn CacheClient>> {
    match config.backend {
        BackendKind::Upstash => Ok(Box::new(UpstashClient::new(config, transport)?)),
    }
}
