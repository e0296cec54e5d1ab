//! Configuration schema for lazydeploy
//!
//! Configuration is read from `lazydeploy.toml` in the working directory
//! unless another file is given.

use crate::repository::RemoteRepository;
use crate::resolver::remote::DEFAULT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP transport settings
    pub http: HttpConfig,

    /// Remote repositories holding published snapshots
    pub repositories: Vec<RemoteRepository>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Never contact remote repositories
    pub offline: bool,

    /// Build output directory; the scratch repository lives below it
    pub output_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            offline: false,
            output_dir: PathBuf::from("target"),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Overall timeout per request, in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent to repositories
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: concat!("lazydeploy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
