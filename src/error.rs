//! Error types for lazydeploy
//!
//! Only faults that must stop the build surface as `LazyDeployError`.
//! Everything the change detector can recover from is folded into a
//! "changed" decision instead (see [`crate::detector`]).

use crate::resolver::ResolveError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lazydeploy operations
pub type LazyDeployResult<T> = Result<T, LazyDeployError>;

/// All errors that can escape a lazydeploy invocation
#[derive(Error, Debug)]
pub enum LazyDeployError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid repository {id}: {reason}")]
    RepositoryInvalid { id: String, reason: String },

    // Resolver faults that are neither "not found" nor "resolution failed"
    #[error("Artifact resolver fault: {0}")]
    Resolver(#[source] ResolveError),

    // Property store errors
    #[error("Malformed property file {path} at line {line}")]
    PropertiesMalformed { path: PathBuf, line: usize },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LazyDeployError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid { .. } => Some("Check the file against: lazydeploy config show"),
            Self::RepositoryInvalid { .. } => {
                Some("Repository URLs must be absolute file://, http:// or https:// URLs")
            }
            Self::Resolver(ResolveError::InvalidArtifact { .. }) => {
                Some("Group, name, version and type must all be non-empty")
            }
            Self::PathNotFound(_) => Some("Build the artifact before running the check"),
            _ => None,
        }
    }
}
