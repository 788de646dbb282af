//! Object storage for generated audio
//!
//! Uploads are best-effort: callers log a failure and carry on without a URL.

#[cfg(feature = "s3")]
mod s3;

#[cfg(feature = "s3")]
pub use s3::S3Storage;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

/// Destination for generated audio
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    fn name(&self) -> &str;

    /// Store `bytes` under `bucket/key` and return the object URL
    async fn upload(&self, bytes: Bytes, bucket: &str, key: &str) -> Result<String>;
}

/// Build the configured storage backend, if any
pub fn from_config(config: &StorageConfig) -> Result<Option<Arc<dyn ObjectStorage>>> {
    let Some(s3) = &config.s3 else {
        info!("Object storage not configured, audio will be returned inline");
        return Ok(None);
    };

    #[cfg(feature = "s3")]
    {
        let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(s3.clone()));
        info!("S3 storage enabled in region {}", s3.region);
        Ok(Some(storage))
    }

    #[cfg(not(feature = "s3"))]
    {
        warn!(
            "S3 configured for region {} but the s3 feature is disabled",
            s3.region
        );
        Ok(None)
    }
}

/// Upload and swallow failures, returning the URL when it worked
pub async fn upload_best_effort(
    storage: Option<&dyn ObjectStorage>,
    bytes: Bytes,
    bucket: &str,
    key: &str,
) -> Option<String> {
    let Some(storage) = storage else {
        warn!("Upload to s3://{}/{} requested but no storage is configured", bucket, key);
        return None;
    };

    match storage.upload(bytes, bucket, key).await {
        Ok(url) => {
            info!("Audio uploaded to {}", url);
            Some(url)
        }
        Err(e) => {
            warn!("Upload to {} failed, returning audio without URL: {}", storage.name(), e);
            None
        }
    }
}
