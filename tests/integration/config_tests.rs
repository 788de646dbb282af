//! Configuration loading

use higgs_audio_serverless::Config;
use higgs_audio_serverless::config::LogFormat;
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_full_config_file() {
    let yaml = r#"
server:
  port: 9000
  cors_allowed_origins: ["https://console.example.com"]
model:
  backend_url: "http://gpu-node:8001"
  warm_up: false
voices:
  prompts_path: "/data/voices"
storage:
  s3:
    region: "eu-west-1"
    default_bucket: "tts-output"
monitoring:
  alert_cooldown: 120
  health:
    accelerator_memory_gb: 40.0
  governor:
    memory_pressure_ratio: 0.9
logging:
  level: debug
  format: json
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.server.port, 9000);
    assert!(!config.model.warm_up);
    assert_eq!(config.voices.prompts_path.to_str(), Some("/data/voices"));
    let s3 = config.storage.s3.as_ref().unwrap();
    assert_eq!(s3.region, "eu-west-1");
    assert_eq!(s3.default_bucket.as_deref(), Some("tts-output"));
    assert_eq!(config.monitoring.alert_cooldown, 120);
    assert_eq!(config.monitoring.health.accelerator_memory_gb, 40.0);
    assert_eq!(config.monitoring.health.system_memory_gb, 15.0);
    assert_eq!(config.monitoring.governor.memory_pressure_ratio, 0.9);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[tokio::test]
async fn test_invalid_thresholds_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"monitoring:\n  governor:\n    memory_pressure_ratio: 1.5\n")
        .unwrap();

    let err = Config::from_file(file.path()).await.unwrap_err();
    assert!(err.to_string().contains("Monitoring config error"));
}

#[tokio::test]
async fn test_config_round_trips_through_yaml() {
    let yaml = Config::default().to_yaml().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.generation.max_new_tokens, 2048);
    assert_eq!(config.monitoring.max_events, 10_000);
}

#[test]
fn test_missing_file_outside_runtime() {
    let result = tokio_test::block_on(Config::from_file("/nonexistent/serverless.yaml"));
    tokio_test::assert_err!(result);
}
