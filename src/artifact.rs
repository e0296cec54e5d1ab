//! Artifact coordinates and snapshot version handling
//!
//! An [`ArtifactRef`] carries the identity of one build output plus an
//! optional path to its file on disk. The identity is fixed at construction;
//! the file slot is filled in by the build (for the local artifact) or by a
//! resolver (for a fetched copy).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Version suffix marking a development build
pub const SNAPSHOT: &str = "SNAPSHOT";

/// Default artifact type
pub const DEFAULT_TYPE: &str = "jar";

/// Reference to a single artifact: coordinates plus an optional resolved file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    file: Option<PathBuf>,
}

impl ArtifactRef {
    /// Create a reference to a `jar` artifact with no classifier and no file
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            kind: DEFAULT_TYPE.to_string(),
            file: None,
        }
    }

    /// Set the classifier; empty strings mean "no classifier"
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        let classifier = classifier.into();
        self.classifier = (!classifier.is_empty()).then_some(classifier);
        self
    }

    /// Set the artifact type (`jar`, `pom`, `test-jar`, ...)
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Attach the file holding this artifact's content
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// An attached artifact: same group, name and version with its own
    /// classifier, type and file
    pub fn attached(
        &self,
        classifier: Option<&str>,
        kind: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
            kind: kind.into(),
            file: Some(file.into()),
        }
    }

    /// Copy with the same identity and an empty file slot
    pub fn unresolved_copy(&self) -> Self {
        Self {
            file: None,
            ..self.clone()
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        self.file = Some(file.into());
    }

    /// Explicit classifier, or the one implied by the type
    pub fn classifier(&self) -> Option<&str> {
        self.classifier
            .as_deref()
            .or_else(|| implied_classifier(&self.kind))
    }

    /// File extension implied by the type
    pub fn extension(&self) -> &str {
        extension_for_type(&self.kind)
    }

    /// Whether this is a development build eligible for the skip check
    pub fn is_snapshot(&self) -> bool {
        self.base_version().ends_with(SNAPSHOT)
    }

    /// The `-SNAPSHOT` form of a timestamped version, otherwise the version
    pub fn base_version(&self) -> String {
        match split_timestamped(&self.version) {
            Some((prefix, _, _)) => format!("{}-{}", prefix, SNAPSHOT),
            None => self.version.clone(),
        }
    }

    /// Key identifying the group/name/base-version triple
    pub fn version_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.base_version()
        )
    }

    /// Names the first missing coordinate, if any
    pub fn missing_coordinate(&self) -> Option<&'static str> {
        if self.group_id.trim().is_empty() {
            Some("group")
        } else if self.artifact_id.trim().is_empty() {
            Some("name")
        } else if self.version.trim().is_empty() {
            Some("version")
        } else if self.kind.trim().is_empty() {
            Some("type")
        } else {
            None
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.kind)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// Split `1.0-20240131.093015-7` into `("1.0", "20240131.093015", "7")`
pub fn split_timestamped(version: &str) -> Option<(&str, &str, &str)> {
    let (rest, build) = version.rsplit_once('-')?;
    if build.is_empty() || !build.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (prefix, timestamp) = rest.rsplit_once('-')?;
    if !is_snapshot_timestamp(timestamp) {
        return None;
    }

    Some((prefix, timestamp, build))
}

/// `yyyyMMdd.HHmmss`
fn is_snapshot_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'.'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}

/// Map an artifact type to the extension its file carries
pub fn extension_for_type(kind: &str) -> &str {
    match kind {
        "test-jar" | "maven-plugin" | "ejb" | "ejb-client" | "java-source" | "javadoc" => "jar",
        other => other,
    }
}

fn implied_classifier(kind: &str) -> Option<&'static str> {
    match kind {
        "test-jar" => Some("tests"),
        "ejb-client" => Some("client"),
        "java-source" => Some("sources"),
        "javadoc" => Some("javadoc"),
        _ => None,
    }
}
