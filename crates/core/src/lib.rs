//! Pure logic for the cache proxy - no I/O, no side effects.
//!
//! This crate provides:
//! - Service configuration types with validation and defaults
//! - Partition-aware cache key derivation
//! - Redis REST command building and response validation
//! - Stored payload encoding
//! - The `CacheClient` and `Transport` traits implemented by the shell crate
//!
//! # Example
//!
//! ```
//! use cacheproxy_core::cache::make_cache_key;
//! use cacheproxy_core::config::{resolve, ServiceConfig};
//! use cacheproxy_core::protocol::{Command, Request};
//!
//! let config = resolve(&ServiceConfig::new("upstash").with_prefix("app")).unwrap();
//! let keys = make_cache_key(&config.partition, "foo");
//! assert_eq!(keys.cache_key, "app:c:s:u-foo");
//!
//! let body = Request::Single(Command::get(&keys.cache_key)).to_body().unwrap();
//! assert_eq!(body, r#"["GET","app:c:s:u-foo"]"#);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod protocol;

pub use error::{CacheProxyError, Result};
