//! Helper functions for creating and classifying errors

use super::types::ServiceError;

/// Keywords that mark an error message as an accelerator memory failure
const RESOURCE_KEYWORDS: [&str; 2] = ["out of memory", "cuda"];

impl ServiceError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation(message.into())
    }

    pub fn resource_exhausted<S: Into<String>>(message: S) -> Self {
        Self::ResourceExhausted(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn monitoring<S: Into<String>>(message: S) -> Self {
        Self::Monitoring(message.into())
    }

    pub fn not_ready<S: Into<String>>(message: S) -> Self {
        Self::NotReady(message.into())
    }

    pub fn alert<S: Into<String>>(message: S) -> Self {
        Self::Alert(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stable name used as the `error_kind` of recorded error events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Serialization(_) => "SerializationError",
            Self::Yaml(_) => "YamlError",
            Self::HttpClient(_) => "HttpClientError",
            Self::Validation(_) => "ValidationError",
            Self::Generation(_) => "GenerationError",
            Self::ResourceExhausted(_) => "ResourceExhausted",
            Self::Storage(_) => "StorageError",
            Self::Monitoring(_) => "MonitoringError",
            Self::NotReady(_) => "NotReady",
            Self::DuplicateRequest(_) => "DuplicateRequest",
            Self::UnknownRequest(_) => "UnknownRequest",
            Self::Alert(_) => "AlertError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Whether this is a transient accelerator resource failure
    pub fn is_transient_resource(&self) -> bool {
        matches!(self, Self::ResourceExhausted(_)) || is_resource_message(&self.to_string())
    }

    /// Whether this error is the caller's fault rather than a system fault
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Check an error message for accelerator memory keywords
pub fn is_resource_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RESOURCE_KEYWORDS.iter().any(|k| lower.contains(k))
}
