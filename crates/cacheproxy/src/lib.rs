//! cacheproxy - backend-agnostic cache over external key-value stores.
//!
//! [`CacheProxy`] validates a [`ServiceConfig`], picks the backend client it
//! names, probes it with `PING` and then delegates every operation.
//!
//! ```no_run
//! use cacheproxy::{CacheProxy, ServiceConfig};
//! use serde_json::json;
//!
//! # async fn run() -> cacheproxy::Result<()> {
//! let config = ServiceConfig::new("upstash")
//!     .with_url("https://example.upstash.io")
//!     .with_token("secret")
//!     .with_user_id("alice");
//!
//! let cache = CacheProxy::connect(config).await?;
//! cache.put("greeting", &json!("hello"), Some(60)).await?;
//! assert_eq!(cache.get("greeting").await?, Some(json!("hello")));
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod proxy;
pub mod transport;

pub use cacheproxy_core::cache::PutOutcome;
pub use cacheproxy_core::config::{BackendKind, Partition, ServiceConfig};
pub use cacheproxy_core::{CacheProxyError, Result};
pub use proxy::{CacheProxy, CacheProxyBuilder};
