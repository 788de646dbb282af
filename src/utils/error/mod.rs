//! Error handling for the service
//!
//! This module defines the error type shared by every layer of the crate and
//! its mapping onto HTTP responses.

mod helpers;
mod response;
#[cfg(test)]
mod tests;
mod types;

pub use helpers::is_resource_message;
pub use response::{ErrorDetail, ErrorResponse};
pub use types::{Result, ServiceError};
