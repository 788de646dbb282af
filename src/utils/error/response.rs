//! HTTP response handling for errors

use super::types::ServiceError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();
        let message = match self {
            ServiceError::Io(_) | ServiceError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl ServiceError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServiceError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ServiceError::Serialization(_) | ServiceError::Yaml(_) => {
                (StatusCode::BAD_REQUEST, "PARSING_ERROR")
            }
            ServiceError::NotReady(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY"),
            ServiceError::ResourceExhausted(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "RESOURCE_EXHAUSTED")
            }
            ServiceError::Generation(_) | ServiceError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR")
            }
            ServiceError::Storage(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
            ServiceError::DuplicateRequest(_) => (StatusCode::CONFLICT, "DUPLICATE_REQUEST"),
            ServiceError::UnknownRequest(_) => (StatusCode::NOT_FOUND, "UNKNOWN_REQUEST"),
            ServiceError::Monitoring(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MONITORING_ERROR"),
            ServiceError::Alert(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ALERT_ERROR"),
            ServiceError::Io(_) | ServiceError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
