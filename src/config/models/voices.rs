//! Voice prompt configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Voice prompt directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicesConfig {
    /// Directory holding `<voice>.wav` and `<voice>.txt` pairs
    #[serde(default = "default_prompts_path")]
    pub prompts_path: PathBuf,
}

fn default_prompts_path() -> PathBuf {
    PathBuf::from("/app/voice_prompts")
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            prompts_path: default_prompts_path(),
        }
    }
}
