//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;

use cacheproxy_core::protocol::{HttpRequest, HttpResponse, Transport};
use cacheproxy_core::{CacheProxyError, Result};

/// Maps reqwest errors to CacheProxyError.
fn map_reqwest_error(err: reqwest::Error) -> CacheProxyError {
    CacheProxyError::Connection(err.to_string())
}

/// Production transport. Cheap to clone; clones share a connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.post(&request.url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(HttpResponse { status, body })
    }
}
