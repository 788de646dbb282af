//! Integration tests for higgs-audio-serverless
//!
//! These exercise the handler, monitoring and configuration together,
//! with only the inference backend and object storage faked.

pub mod config_tests;
pub mod handler_tests;
pub mod monitoring_tests;
