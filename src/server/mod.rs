//! HTTP server and the serverless handler
//!
//! [`handler::ServerlessHandler`] owns the request flow; the actix routes
//! and the CLI both drive it.

pub mod builder;
pub mod handler;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;


pub use builder::ServerBuilder;
pub use handler::{HandlerHealth, ServerlessHandler};
pub use server::HttpServer;
pub use state::AppState;
pub use types::{GenerationOutcome, HandlerResponse};
