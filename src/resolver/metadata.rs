//! Snapshot metadata (`maven-metadata.xml`) of a version directory
//!
//! Only the parts needed to name the latest published snapshot file are
//! read: the `<snapshot>` block and the `<snapshotVersions>` list.

use crate::artifact::{ArtifactRef, SNAPSHOT};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One `<snapshotVersion>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotVersion {
    pub classifier: Option<String>,
    pub extension: String,
    pub value: String,
}

/// Snapshot information of one base version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMetadata {
    pub timestamp: Option<String>,
    pub build_number: Option<u32>,
    pub local_copy: bool,
    pub versions: Vec<SnapshotVersion>,
}

impl SnapshotMetadata {
    /// Parse a metadata document
    pub fn parse(xml: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(xml);
        let mut parser = MetadataParser::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    parser.handle_start(name);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| format!("bad text at {}: {}", reader.buffer_position(), err))?;
                    parser.handle_text(text.trim())?;
                }
                Ok(Event::End(_)) => parser.handle_end(),
                Ok(Event::Eof) => break,
                Err(e) => return Err(format!("at {}: {}", reader.buffer_position(), e)),
                _ => {}
            }
        }

        if !parser.saw_root {
            return Err("not a repository metadata document".to_string());
        }
        Ok(parser.metadata)
    }

    /// Version string under which the remote stores `artifact`.
    ///
    /// Falls back to the base version when the metadata carries no
    /// timestamped build, or marks the snapshot as a local copy.
    pub fn remote_version(&self, artifact: &ArtifactRef) -> String {
        let base = artifact.base_version();
        if self.local_copy {
            return base;
        }

        let classifier = artifact.classifier();
        if let Some(entry) = self.versions.iter().find(|v| {
            v.classifier.as_deref() == classifier && v.extension == artifact.extension()
        }) {
            return entry.value.clone();
        }

        match (&self.timestamp, self.build_number) {
            (Some(timestamp), Some(build)) => match base.strip_suffix(SNAPSHOT) {
                Some(prefix) => format!("{}{}-{}", prefix, timestamp, build),
                None => base,
            },
            _ => base,
        }
    }
}

#[derive(Default)]
struct MetadataParser {
    metadata: SnapshotMetadata,
    path: Vec<String>,
    current: Option<SnapshotVersion>,
    saw_root: bool,
}

impl MetadataParser {
    fn handle_start(&mut self, name: String) {
        if self.path.is_empty() && name == "metadata" {
            self.saw_root = true;
        }
        if name == "snapshotVersion" {
            self.current = Some(SnapshotVersion::default());
        }
        self.path.push(name);
    }

    fn handle_end(&mut self) {
        if self.path.pop().as_deref() == Some("snapshotVersion") {
            if let Some(entry) = self.current.take() {
                self.metadata.versions.push(entry);
            }
        }
    }

    fn handle_text(&mut self, text: &str) -> Result<(), String> {
        if text.is_empty() {
            return Ok(());
        }

        let parent = parent_of(&self.path);
        let leaf = self.path.last().map(String::as_str);

        match (parent, leaf) {
            (Some("snapshot"), Some("timestamp")) => {
                self.metadata.timestamp = Some(text.to_string());
            }
            (Some("snapshot"), Some("buildNumber")) => {
                let build = text
                    .parse()
                    .map_err(|_| format!("invalid buildNumber: {}", text))?;
                self.metadata.build_number = Some(build);
            }
            (Some("snapshot"), Some("localCopy")) => {
                self.metadata.local_copy = text == "true";
            }
            (Some("snapshotVersion"), Some(field)) => {
                if let Some(entry) = self.current.as_mut() {
                    match field {
                        "classifier" => entry.classifier = Some(text.to_string()),
                        "extension" => entry.extension = text.to_string(),
                        "value" => entry.value = text.to_string(),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn parent_of(path: &[String]) -> Option<&str> {
    let len = path.len();
    (len >= 2).then(|| path[len - 2].as_str())
}
