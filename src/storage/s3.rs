//! Amazon S3 storage

use super::ObjectStorage;
use crate::config::S3Config;
use crate::generation::WAV_CONTENT_TYPE;
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// S3 uploads; one client per bucket, built on first use
#[derive(Debug)]
pub struct S3Storage {
    config: S3Config,
    clients: Mutex<HashMap<String, Arc<AmazonS3>>>,
}

impl S3Storage {
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client(&self, bucket: &str) -> Result<Arc<AmazonS3>> {
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(bucket) {
            return Ok(Arc::clone(client));
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(&self.config.region)
            .with_bucket_name(bucket)
            .with_allow_http(self.config.allow_http);
        if let Some(endpoint) = &self.config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(key) = &self.config.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = &self.config.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }

        let client = Arc::new(
            builder
                .build()
                .map_err(|e| ServiceError::storage(format!("S3 client for {}: {}", bucket, e)))?,
        );
        clients.insert(bucket.to_string(), Arc::clone(&client));
        debug!("Created S3 client for bucket {}", bucket);
        Ok(client)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload(&self, bytes: Bytes, bucket: &str, key: &str) -> Result<String> {
        let client = self.client(bucket)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, WAV_CONTENT_TYPE.into());
        let options = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        let size = bytes.len();
        client
            .put_opts(&ObjectPath::from(key), PutPayload::from(bytes), options)
            .await
            .map_err(|e| ServiceError::storage(format!("S3 upload failed: {}", e)))?;

        debug!("Uploaded {} bytes to s3://{}/{}", size, bucket, key);
        Ok(format!("s3://{}/{}", bucket, key))
    }
}
