//! Common test utilities

pub mod assertions;
pub mod backend;
pub mod fixtures;
pub mod storage;

pub use backend::FakeBackend;
pub use fixtures::TestContext;
pub use storage::{FailingStorage, RecordingStorage};
