use crate::error::{Result, YandexError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.music.yandex.net";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Options forwarded to the API client when the extractor is activated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YandexConfig {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl YandexConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            uid: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(YandexError::ConfigError(
                "access_token must not be empty".to_string(),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(YandexError::ConfigError(format!(
                "base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(YandexError::ConfigError(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
