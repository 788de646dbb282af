//! Tests for configuration validation

use super::trait_def::Validate;
use crate::config::models::*;

#[test]
fn test_server_config_validation() {
    let mut config = ServerConfig::default();
    assert!(config.validate().is_ok());

    config.port = 0;
    assert!(config.validate().is_err());

    config.port = 8080;
    config.host = "".to_string();
    assert!(config.validate().is_err());

    config.host = "127.0.0.1".to_string();
    config.workers = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_model_config_validation() {
    let mut config = ModelConfig::default();
    assert!(config.validate().is_ok());

    config.backend_url = "localhost:8001".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_storage_config_validation() {
    assert!(StorageConfig::default().validate().is_ok());

    let mut config = StorageConfig {
        s3: Some(S3Config {
            endpoint: Some("http://minio:9000".to_string()),
            ..Default::default()
        }),
    };
    assert!(config.validate().is_err());

    if let Some(s3) = config.s3.as_mut() {
        s3.allow_http = true;
    }
    assert!(config.validate().is_ok());

    if let Some(s3) = config.s3.as_mut() {
        s3.access_key_id = Some("key".to_string());
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_monitoring_config_validation() {
    let mut config = MonitoringConfig::default();
    assert!(config.validate().is_ok());

    config.max_events = 0;
    assert!(config.validate().is_err());

    config.max_events = 100;
    config.alert_webhook_url = Some("hooks.example.com".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_alert_thresholds_ordering() {
    let thresholds = AlertThresholds {
        error_rate_elevated: 15.0,
        ..Default::default()
    };
    assert!(thresholds.validate().is_err());
}

#[test]
fn test_governor_config_validation() {
    let mut config = GovernorConfig::default();
    assert!(config.validate().is_ok());

    config.memory_pressure_ratio = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_generation_config_validation() {
    let mut config = GenerationConfig::default();
    assert!(config.validate().is_ok());

    config.top_p = 0.0;
    assert!(config.validate().is_err());

    config.top_p = 0.9;
    config.max_new_tokens = 5000;
    assert!(config.validate().is_err());
}
