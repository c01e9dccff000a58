//! Transports carrying REST requests to the backend.
//!
//! - [`ReqwestTransport`]: HTTP via reqwest, used in production
//! - `MemoryTransport`: in-memory emulation of the Upstash REST API (`mock` feature)
//! - `ScriptedTransport`: replays canned responses and records requests (`mock` feature)

mod http;
#[cfg(any(test, feature = "mock"))]
mod memory;
#[cfg(any(test, feature = "mock"))]
mod scripted;

pub use http::ReqwestTransport;
#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryTransport;
#[cfg(any(test, feature = "mock"))]
pub use scripted::ScriptedTransport;
