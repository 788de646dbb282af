//! Object storage configuration

use serde::{Deserialize, Serialize};

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// S3 configuration; uploads are disabled when absent
    pub s3: Option<S3Config>,
}

/// S3 configuration
///
/// Credentials left empty are read from the standard `AWS_*` environment
/// variables by the client builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (for S3-compatible services)
    pub endpoint: Option<String>,
    /// Bucket used when a request names none
    pub default_bucket: Option<String>,
    /// Access key ID
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Permit plain HTTP endpoints (local S3-compatible stores)
    #[serde(default)]
    pub allow_http: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            default_bucket: None,
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
        }
    }
}
