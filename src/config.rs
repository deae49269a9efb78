//! Layered configuration for the journal.
//!
//! Sources, highest priority first:
//! 1. `API_KEY` / `GEMINI_API_KEY`, then `MINDFUL_*` variables (`__` separates sections)
//! 2. A TOML file passed with `--config`
//! 3. `<config_dir>/mindful-journal/config.toml`
//! 4. Built-in defaults

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "mindful-journal";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

const fn default_analysis_temperature() -> f32 {
    0.7
}

const fn default_chat_temperature() -> f32 {
    0.8
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,
    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,
    /// Unset means requests wait until the service answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            analysis_temperature: default_analysis_temperature(),
            chat_temperature: default_chat_temperature(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl JournalConfig {
    /// Loads `.env` from the working directory, then every layer.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config: Self = Self::figment(explicit_file).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(explicit_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        if let Some(path) = explicit_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("MINDFUL_").split("__"))
            .merge(
                Env::raw()
                    .only(&["API_KEY", "GEMINI_API_KEY"])
                    .map(|_| "gemini.api_key".into()),
            )
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("gemini.analysis_temperature", self.gemini.analysis_temperature),
            ("gemini.chat_temperature", self.gemini.chat_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("{value} is outside 0.0..=2.0"),
                });
            }
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gemini.model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
