//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `server_validators`: server, model, storage and logging sections
//! - `monitoring_validators`: monitoring, generation and threshold sections
//! - `tests`: test suite for all validators

mod monitoring_validators;
mod server_validators;
#[cfg(test)]
mod tests;
mod trait_def;

pub use trait_def::Validate;
