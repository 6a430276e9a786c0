use serde::{Deserialize, Serialize};

use crate::utils::error::{ImportError, Result};

/// Optional TOML configuration. Every knob is optional; values given on the
/// command line win over values from this file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub batch_size: Option<usize>,
    pub max_in_flight: Option<usize>,
    pub worker_threads: Option<usize>,
    pub output: Option<String>,
}

impl FileConfig {
    pub fn load(path: &str) -> Result<FileConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ImportError::InvalidConfig {
            field: "config".to_string(),
            value: path.to_string(),
            reason: e.to_string(),
        })
    }
}
