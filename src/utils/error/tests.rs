//! Tests for error handling

use super::types::ServiceError;
use actix_web::ResponseError;
use actix_web::http::StatusCode;

#[test]
fn test_helper_constructors() {
    let error = ServiceError::validation("temperature must be between 0 and 2");
    assert!(matches!(error, ServiceError::Validation(msg) if msg.contains("temperature")));

    let error = ServiceError::storage("bucket missing");
    assert!(matches!(error, ServiceError::Storage(_)));
}

#[test]
fn test_display_prefixes() {
    assert_eq!(
        ServiceError::config("bad port").to_string(),
        "Configuration error: bad port"
    );
    assert_eq!(
        ServiceError::not_ready("loading").to_string(),
        "Service not ready: loading"
    );
}

#[test]
fn test_kind_names() {
    assert_eq!(ServiceError::resource_exhausted("x").kind(), "ResourceExhausted");
    assert_eq!(ServiceError::generation("x").kind(), "GenerationError");
    assert_eq!(ServiceError::validation("x").kind(), "ValidationError");
}

#[test]
fn test_transient_resource_detection() {
    assert!(ServiceError::resource_exhausted("allocation failed").is_transient_resource());
    assert!(ServiceError::generation("CUDA error: device-side assert").is_transient_resource());
    assert!(ServiceError::generation("Tried to allocate: Out Of Memory").is_transient_resource());
    assert!(!ServiceError::generation("backend returned 500").is_transient_resource());
}

#[test]
fn test_caller_error() {
    assert!(ServiceError::validation("x").is_caller_error());
    assert!(!ServiceError::internal("x").is_caller_error());
}

#[test]
fn test_status_codes() {
    assert_eq!(
        ServiceError::validation("x").status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ServiceError::not_ready("x").status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        ServiceError::internal("x").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: ServiceError = io.into();
    assert!(matches!(error, ServiceError::Io(_)));
}
