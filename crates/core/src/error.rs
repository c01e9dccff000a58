use thiserror::Error;

/// Errors raised by the cache proxy.
///
/// Every variant is fatal to the operation that produced it. Nothing in this
/// workspace retries or recovers locally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheProxyError {
    /// The service configuration is missing, malformed or names an unknown backend.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The backend did not answer the liveness probe as expected.
    #[error("Liveness check failed: {0}")]
    Liveness(String),

    /// The backend answered with a non-200 status.
    #[error("Bad response from backend ({status}): {body}")]
    Transport { status: u16, body: String },

    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The response body does not have the expected result-sequence shape.
    #[error("Unexpected response shape: {0}")]
    Protocol(String),

    /// A stored entry carries a different logical key than the one requested.
    #[error("Expected to get result for key {expected}, but got {actual}")]
    DataIntegrity { expected: String, actual: String },

    /// Programming-level misuse, such as sending an empty command.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for cache proxy operations.
pub type Result<T> = std::result::Result<T, CacheProxyError>;

impl From<serde_json::Error> for CacheProxyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let error = CacheProxyError::Configuration("token must be a non-empty string".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: token must be a non-empty string"
        );
    }

    #[test]
    fn test_transport_display_carries_body() {
        let error = CacheProxyError::Transport {
            status: 500,
            body: "ERR internal".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Bad response from backend (500): ERR internal"
        );
    }

    #[test]
    fn test_data_integrity_display() {
        let error = CacheProxyError::DataIntegrity {
            expected: "foo".to_string(),
            actual: "bar".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Expected to get result for key foo, but got bar"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = CacheProxyError::from(err);
        assert!(matches!(error, CacheProxyError::Serialization(_)));
    }
}
