use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "cursed-labyrinth.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_interval_ms: u64,
    pub pulse_interval_ms: u64,
    pub speech_duration_ms: u64,
    pub save_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub bell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 300,
            pulse_interval_ms: 80,
            speech_duration_ms: 3_000,
            save_path: PathBuf::from("maze_save.txt"),
            log_file: Some(PathBuf::from("cursed-labyrinth.log")),
            seed: None,
            bell: true,
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config_missing_using_defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_interval_ms)
    }

    pub fn speech_duration(&self) -> Duration {
        Duration::from_millis(self.speech_duration_ms)
    }
}
