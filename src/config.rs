use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "car_price.json";
pub const MODEL_PATH_ENV: &str = "CAR_PRICE_MODEL_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub allow_placeholder: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            model_path: PathBuf::from("trained_model.json"),
            allow_placeholder: true,
            window_width: 900.0,
            window_height: 760.0,
        }
    }
}

impl AppConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Config file if present, defaults otherwise, then the environment override.
    /// A broken file is logged and ignored.
    pub fn load(path: &Path) -> Self {
        let mut cfg = match Self::from_file(path) {
            Ok(Some(cfg)) => {
                tracing::info!(path = %path.display(), "loaded config");
                cfg
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                AppConfig::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file");
                AppConfig::default()
            }
        };
        cfg.apply_model_override(std::env::var(MODEL_PATH_ENV).ok());
        cfg
    }

    fn apply_model_override(&mut self, value: Option<String>) {
        if let Some(p) = value.filter(|p| !p.trim().is_empty()) {
            tracing::info!(model_path = %p, "model path overridden from {}", MODEL_PATH_ENV);
            self.model_path = PathBuf::from(p);
        }
    }
}
