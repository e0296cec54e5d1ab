//! Conventional default repository layout
//!
//! `org.example:app:1.0-SNAPSHOT` lives under
//! `org/example/app/1.0-SNAPSHOT/app-1.0-SNAPSHOT.jar`.

use crate::artifact::ArtifactRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the snapshot metadata file in a version directory
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// How artifact files are arranged inside a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryLayout {
    #[default]
    Default,
}

impl RepositoryLayout {
    /// Directory of the artifact's base version, as `/`-separated segments
    pub fn version_dir(&self, artifact: &ArtifactRef) -> Vec<String> {
        match self {
            Self::Default => {
                let mut segments: Vec<String> = artifact
                    .group_id()
                    .split('.')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                segments.push(artifact.artifact_id().to_string());
                segments.push(artifact.base_version());
                segments
            }
        }
    }

    /// File name of the artifact when published as `version`
    pub fn file_name(&self, artifact: &ArtifactRef, version: &str) -> String {
        match self {
            Self::Default => {
                let mut name = format!("{}-{}", artifact.artifact_id(), version);
                if let Some(classifier) = artifact.classifier() {
                    name.push('-');
                    name.push_str(classifier);
                }
                name.push('.');
                name.push_str(artifact.extension());
                name
            }
        }
    }

    /// Repository-relative path of the artifact published as `version`
    pub fn relative_path(&self, artifact: &ArtifactRef, version: &str) -> String {
        let mut segments = self.version_dir(artifact);
        segments.push(self.file_name(artifact, version));
        segments.join("/")
    }

    /// Repository-relative path of the version directory's metadata
    pub fn metadata_path(&self, artifact: &ArtifactRef) -> String {
        let mut segments = self.version_dir(artifact);
        segments.push(METADATA_FILE.to_string());
        segments.join("/")
    }

    /// Local path of the artifact stored under its base version below `basedir`
    pub fn local_path(&self, basedir: &Path, artifact: &ArtifactRef) -> PathBuf {
        let mut path = basedir.to_path_buf();
        for segment in self.version_dir(artifact) {
            path.push(segment);
        }
        path.push(self.file_name(artifact, &artifact.base_version()));
        path
    }
}
