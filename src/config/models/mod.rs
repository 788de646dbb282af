//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

pub mod generation;
pub mod logging;
pub mod model;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod voices;

pub use generation::*;
pub use logging::*;
pub use model::*;
pub use monitoring::*;
pub use server::*;
pub use storage::*;
pub use voices::*;

/// Default bind host
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default request timeout in seconds
pub fn default_request_timeout() -> u64 {
    600
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_true() -> bool {
    true
}
