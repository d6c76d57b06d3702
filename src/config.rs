//! Runtime configuration read from the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PortfolioError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CHAT_HISTORY_FILE: &str = "chat_sessions.json";

/// Backend location and local storage settings
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build configuration from PORTFOLIO_* environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PORTFOLIO_API_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_api_url(&url);
        }

        if let Some(dir) = lookup("PORTFOLIO_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("PORTFOLIO_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                PortfolioError::Config(format!(
                    "PORTFOLIO_HTTP_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?;
            if secs == 0 {
                return Err(PortfolioError::Config(
                    "PORTFOLIO_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Override the backend base URL
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Override the local data directory
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Location of the cached chat sessions
    pub fn chat_history_path(&self) -> PathBuf {
        self.data_dir.join(CHAT_HISTORY_FILE)
    }
}
