//! Utility modules
//!
//! - **error**: error type, result alias and HTTP error mapping
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{Result, ServiceError};
