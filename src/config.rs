use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::infrastructure::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub extraction_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            extraction_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any variable source; unset or blank variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(v) = get("HOST") {
            settings.host = v;
        }
        if let Some(v) = get("PORT") {
            settings.port = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name: "PORT", value: v })?;
        }
        if let Some(v) = get("DATA_DIR") {
            settings.data_dir = PathBuf::from(v);
        }
        settings.gemini_api_key = get("API_KEY").or_else(|| get("GEMINI_API_KEY"));
        if let Some(v) = get("GEMINI_MODEL") {
            settings.gemini_model = v;
        }
        if let Some(v) = get("GEMINI_BASE_URL") {
            settings.gemini_base_url = v;
        }
        if let Some(v) = get("EXTRACTION_TIMEOUT_SECS") {
            let secs: u64 = v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "EXTRACTION_TIMEOUT_SECS",
                value: v.clone(),
            })?;
            settings.extraction_timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
