//! Object storage doubles

use async_trait::async_trait;
use bytes::Bytes;
use higgs_audio_serverless::storage::ObjectStorage;
use higgs_audio_serverless::{Result, ServiceError};
use parking_lot::Mutex;

/// Storage whose uploads always fail
#[derive(Debug, Default)]
pub struct FailingStorage;

#[async_trait]
impl ObjectStorage for FailingStorage {
    fn name(&self) -> &str {
        "failing"
    }

    async fn upload(&self, _bytes: Bytes, bucket: &str, _key: &str) -> Result<String> {
        Err(ServiceError::storage(format!("bucket {bucket} is unreachable")))
    }
}

/// Storage that keeps every upload in memory
#[derive(Debug, Default)]
pub struct RecordingStorage {
    pub uploads: Mutex<Vec<(String, String, Bytes)>>,
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upload(&self, bytes: Bytes, bucket: &str, key: &str) -> Result<String> {
        self.uploads
            .lock()
            .push((bucket.to_string(), key.to_string(), bytes));
        Ok(format!("s3://{bucket}/{key}"))
    }
}
