//! Build property store
//!
//! Properties are kept as `key=value` lines. Blank lines and lines starting
//! with `#` are ignored when loading.

use crate::error::{LazyDeployError, LazyDeployResult};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Ordered set of build properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    values: BTreeMap<String, String>,
}

impl BuildProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from `path`; a missing file yields an empty store
    pub fn load(path: &Path) -> LazyDeployResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No properties at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(LazyDeployError::io(
                    format!("reading properties from {}", path.display()),
                    e,
                ))
            }
        };

        let mut values = BTreeMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) =
                line.split_once('=')
                    .ok_or_else(|| LazyDeployError::PropertiesMalformed {
                        path: path.to_path_buf(),
                        line: index + 1,
                    })?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { values })
    }

    /// Write all properties to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> LazyDeployResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| LazyDeployError::io(format!("creating {}", parent.display()), e))?;
        }

        let content: String = self
            .values
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect();

        fs::write(path, content).map_err(|e| {
            LazyDeployError::io(format!("writing properties to {}", path.display()), e)
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Copy every entry of `other` over this store
    pub fn extend(&mut self, other: &BuildProperties) {
        self.values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether `key` holds `true` (case-insensitive)
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}
