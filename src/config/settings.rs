// src/config/settings.rs
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, Context};
use serde::{Serialize, Deserialize};

const ENV_PREFIX: &str = "TAXI_OPTIMIZER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the analysis service, without the `/api/...` suffix
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Where exported CSV files are saved
    pub download_dir: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 120,
            download_dir: default_download_dir(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the user's config file, then `TAXI_OPTIMIZER_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_file().as_deref())
    }

    pub fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("download_dir", defaults.download_dir.to_string_lossy().into_owned())?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration values")?;

        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taxi-optimizer").join("config.toml"))
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
