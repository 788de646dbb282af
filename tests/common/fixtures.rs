//! Handler wiring for tests

use higgs_audio_serverless::Config;
use higgs_audio_serverless::generation::{ModelManager, RemoteGenerator, VoiceCatalog};
use higgs_audio_serverless::monitoring::MonitoringSystem;
use higgs_audio_serverless::monitoring::resources::ReportedAccelerator;
use higgs_audio_serverless::server::ServerlessHandler;
use higgs_audio_serverless::storage::ObjectStorage;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

/// A handler talking to `backend_url`, with voices and exports in a temp dir
pub struct TestContext {
    pub handler: Arc<ServerlessHandler>,
    pub monitoring: Arc<MonitoringSystem>,
    pub accelerator: Arc<ReportedAccelerator>,
    pub dir: TempDir,
}

pub fn test_config(backend_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.model.backend_url = backend_url.to_string();
    config.model.load_timeout = 5;
    config.model.generate_timeout = 5;
    config.voices.prompts_path = dir.path().to_path_buf();
    config.monitoring.export_dir = dir.path().join("exports");
    config.monitoring.health.system_memory_gb = 1e9;
    config
}

impl TestContext {
    pub fn new(backend_url: &str, storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self::with_voices(backend_url, storage, &[])
    }

    pub fn with_voices(
        backend_url: &str,
        storage: Option<Arc<dyn ObjectStorage>>,
        voices: &[&str],
    ) -> Self {
        let dir = TempDir::new().expect("temp dir");
        for voice in voices {
            std::fs::write(dir.path().join(format!("{voice}.wav")), b"RIFF").expect("voice audio");
            std::fs::write(dir.path().join(format!("{voice}.txt")), "Reference line.")
                .expect("voice text");
        }

        let config = Arc::new(test_config(backend_url, &dir));
        let accelerator = Arc::new(ReportedAccelerator::new());
        let monitoring = Arc::new(MonitoringSystem::new(&config, accelerator.clone()));
        let generator = RemoteGenerator::new(&config.model)
            .expect("generator")
            .with_accelerator(Arc::clone(&accelerator));
        let models = Arc::new(ModelManager::new(
            Arc::new(generator),
            Arc::clone(&monitoring),
            config.model.clone(),
        ));
        let voices = Arc::new(VoiceCatalog::load(dir.path()));
        let handler = Arc::new(ServerlessHandler::new(
            Arc::clone(&config),
            models,
            voices,
            storage,
            Arc::clone(&monitoring),
        ));

        Self {
            handler,
            monitoring,
            accelerator,
            dir,
        }
    }

    /// Run `input` as a serverless event and return its `output`
    pub async fn run(&self, input: Value) -> Value {
        self.handler.handle(&json!({ "input": input })).await["output"].clone()
    }
}
