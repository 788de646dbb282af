//! Error types for the service

use thiserror::Error;

/// Result type alias for the service
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generation collaborator failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Accelerator out-of-memory or allocation failure
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Monitoring subsystem errors
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Models are not loaded yet
    #[error("Service not ready: {0}")]
    NotReady(String),

    /// A request id was started twice while still active
    #[error("Duplicate request: {0}")]
    DuplicateRequest(String),

    /// A request id was ended without a matching start
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    /// Alert delivery errors
    #[error("Alert error: {0}")]
    Alert(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
