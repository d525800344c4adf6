//! Error types for provisioning

use thiserror::Error;

/// Configuration could not be assembled at start-up
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {key}")]
    Missing { key: &'static str },

    #[error("invalid configuration {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
}

/// Container image lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("unsupported LLM image backend '{0}'")]
    UnsupportedBackend(String),

    #[error("unsupported {backend} LLM image version '{version}'")]
    UnsupportedVersion { backend: String, version: String },

    #[error("no LLM image registry for region '{0}'")]
    UnsupportedRegion(String),
}

/// Anything that stops the endpoint from reaching service
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("image resolution failed: {0}")]
    Image(#[from] ImageError),

    #[error("invalid deployment request: {0}")]
    InvalidRequest(String),

    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    #[error("endpoint {endpoint} ended in status {status}: {reason}")]
    EndpointFailed {
        endpoint: String,
        status: String,
        reason: String,
    },
}

impl DeploymentError {
    pub fn api(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            operation,
            message: message.into(),
        }
    }
}

/// A failure sink could not accept the error record
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode error record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("notification publish failed: {0}")]
    Publish(String),

    #[error("error log write failed: {0}")]
    Store(String),
}
