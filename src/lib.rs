//! # higgs-audio-serverless
//!
//! A serverless handler for a pretrained audio-generation model, with the
//! production monitoring needed to run it: request lifecycle tracking,
//! rolling-window statistics, threshold alerts with cooldown, resource
//! sampling and load-aware parameter governance.
//!
//! The model itself runs in a separate inference backend reached through the
//! [`generation::AudioGenerator`] trait.
//!
//! ## Running one event
//!
//! ```rust,no_run
//! use higgs_audio_serverless::{Config, server::AppState};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::from_config(Config::from_env()?)?;
//!     let event = json!({"input": {"transcript": "Hello there!", "ref_audio": "belinda"}});
//!     let output = state.handler.handle(&event).await;
//!     println!("{}", output["output"]["success"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Serving HTTP
//!
//! ```rust,no_run
//! use higgs_audio_serverless::{Config, server::ServerBuilder};
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/serverless.yaml").await?;
//!     ServerBuilder::new().with_config(config).build()?.start().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod generation;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{Result, ServiceError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
