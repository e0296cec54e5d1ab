//! Build-local scratch repository
//!
//! Fetched comparison copies land in `<output>/lazydeploy/`, never in the
//! user's shared local repository. Nothing here deletes the directory; the
//! next build reuses it or an external clean removes it.

use super::layout::RepositoryLayout;
use crate::artifact::ArtifactRef;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Directory name below the build output directory
pub const SCRATCH_DIR: &str = "lazydeploy";

/// Why no scratch repository could be set up
#[derive(Error, Debug)]
pub enum ScratchUnavailable {
    #[error("cannot make {path} absolute: {source}")]
    Absolute {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("{path} cannot be expressed as a file URL")]
    Url { path: PathBuf },
}

/// Descriptor of the scratch repository: a fetch destination only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchRepository {
    basedir: PathBuf,
    layout: RepositoryLayout,
}

impl ScratchRepository {
    /// Absolute storage root
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Where the artifact's base-version file is stored
    pub fn path_of(&self, artifact: &ArtifactRef) -> PathBuf {
        self.layout.local_path(&self.basedir, artifact)
    }

    /// Advisory lock file guarding one group/name/base-version
    pub fn lock_path(&self, artifact: &ArtifactRef) -> PathBuf {
        let name: String = artifact
            .version_key()
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.basedir.join(".locks").join(format!("{}.lock", name))
    }
}

/// Create (or reuse) the scratch repository below `output_dir`.
///
/// Directory creation failures are only logged; if the directory is still
/// missing afterwards the repository is unavailable.
pub fn provision(output_dir: &Path) -> Result<ScratchRepository, ScratchUnavailable> {
    let dir = output_dir.join(SCRATCH_DIR);

    if !dir.is_dir() {
        if let Err(e) = fs::create_dir_all(&dir) {
            debug!("Could not create scratch repository {}: {}", dir.display(), e);
        }
    }

    let basedir = std::path::absolute(&dir).map_err(|source| ScratchUnavailable::Absolute {
        path: dir.clone(),
        source,
    })?;

    if !basedir.is_dir() {
        return Err(ScratchUnavailable::NotADirectory { path: basedir });
    }

    let url = Url::from_directory_path(&basedir).map_err(|()| ScratchUnavailable::Url {
        path: basedir.clone(),
    })?;

    debug!("Scratch repository ready at {}", url);
    Ok(ScratchRepository {
        basedir,
        layout: RepositoryLayout::Default,
    })
}
