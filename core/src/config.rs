use crate::errors::{ChatError, ChatResult};
use crate::render::{ABSENT_RESULT_TEXT, DEFAULT_FAILURE_MESSAGE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under `~/.config`
pub const APP_NAME: &str = "chatform";

/// Where the chat server listens unless told otherwise
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const ENV_BASE_URL: &str = "CHATFORM_BASE_URL";
pub const ENV_API_KEY: &str = "CHATFORM_API_KEY";
pub const ENV_LOG_LEVEL: &str = "CHATFORM_LOG_LEVEL";

/// Configuration for the chat client
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub failure_message: Option<String>,
    pub absent_text: Option<String>,
    pub log_level: Option<String>,
}

impl ClientConfig {
    /// Built-in values, used underneath everything else
    pub fn defaults() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            api_key: None,
            failure_message: Some(DEFAULT_FAILURE_MESSAGE.to_string()),
            absent_text: Some(ABSENT_RESULT_TEXT.to_string()),
            log_level: Some("info".to_string()),
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns an empty config
    pub fn load_from_file(path: &Path) -> ChatResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ChatError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ChatError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> ChatResult<()> {
        let content = toml::to_string(self)
            .map_err(|e| ChatError::Config(format!("Failed to serialize config: {}", e)))?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ChatError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| ChatError::Config(format!("Failed to write config file: {}", e)))
    }

    /// Values taken from `CHATFORM_*` environment variables
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            base_url: var(ENV_BASE_URL),
            api_key: var(ENV_API_KEY),
            failure_message: None,
            absent_text: None,
            log_level: var(ENV_LOG_LEVEL),
        }
    }

    /// Defaults, then the file at `path` (or the default location), then the environment.
    pub fn load(path: Option<&Path>) -> ChatResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => get_default_config_file(APP_NAME)?,
        };
        let file = Self::load_from_file(&path)?;
        Ok(Self::defaults().merge(&file).merge(&Self::from_env()))
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            failure_message: other
                .failure_message
                .clone()
                .or_else(|| self.failure_message.clone()),
            absent_text: other
                .absent_text
                .clone()
                .or_else(|| self.absent_text.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn failure_message(&self) -> &str {
        self.failure_message
            .as_deref()
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
    }

    pub fn absent_text(&self) -> &str {
        self.absent_text.as_deref().unwrap_or(ABSENT_RESULT_TEXT)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> ChatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ChatError::Config("Could not determine home directory".to_string()))?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> ChatResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
