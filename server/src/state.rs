use std::path::PathBuf;
use std::time::Duration;

use crate::config;

/// Immutable per-process configuration shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub classification_bin: PathBuf,
    pub features_bin: PathBuf,
    pub generator_timeout: Duration,
}

impl AppState {
    pub fn from_env() -> Self {
        Self {
            classification_bin: config::classification_bin(),
            features_bin: config::features_bin(),
            generator_timeout: config::generator_timeout(),
        }
    }
}
