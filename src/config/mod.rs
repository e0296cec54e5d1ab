//! Configuration management for lazydeploy

pub mod schema;

pub use schema::{Config, GeneralConfig, HttpConfig};

use crate::error::{LazyDeployError, LazyDeployResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "lazydeploy.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `./lazydeploy.toml`, or the user config directory when the working
    /// directory cannot be determined
    pub fn default_config_path() -> PathBuf {
        std::env::current_dir()
            .ok()
            .or_else(|| dirs::config_dir().map(|d| d.join("lazydeploy")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load(&self) -> LazyDeployResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file {} not found, using defaults", self.config_path.display());
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> LazyDeployResult<Config> {
        let content = fs::read_to_string(path).map_err(|e| {
            LazyDeployError::io(format!("reading config from {}", path.display()), e)
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| LazyDeployError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if config.http.timeout_secs == 0 {
            return Err(LazyDeployError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: "http.timeout_secs must be greater than 0".to_string(),
            });
        }
        for repository in &config.repositories {
            repository.parsed_url()?;
        }
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> LazyDeployResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            LazyDeployError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    fn ensure_config_dir(&self) -> LazyDeployResult<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LazyDeployError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RemoteRepository;
    use tempfile::TempDir;

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nonexistent.toml"));

        let config = manager.load().unwrap();
        assert!(!config.general.offline);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("conf/lazydeploy.toml"));

        let mut config = Config::default();
        config.general.offline = true;
        config
            .repositories
            .push(RemoteRepository::new("snapshots", "https://repo.example.com/snapshots"));

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert!(loaded.general.offline);
        assert_eq!(loaded.repositories, config.repositories);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lazydeploy.toml");
        fs::write(&path, "[general\n").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().unwrap_err();
        assert!(matches!(err, LazyDeployError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[test]
    fn invalid_repository_url_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lazydeploy.toml");
        fs::write(&path, "[[repositories]]\nid = \"r\"\nurl = \"ftp://example.com\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        assert!(matches!(err, LazyDeployError::RepositoryInvalid { .. }));
    }

    #[test]
    fn zero_timeout_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lazydeploy.toml");
        fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        match err {
            LazyDeployError::ConfigInvalid { reason, .. } => {
                assert!(reason.contains("timeout_secs"))
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }
}
