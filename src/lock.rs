//! Advisory per-artifact lock inside the scratch repository
//!
//! Builds sharing an output directory may check the same
//! group/name/base-version at the same time. The lock serializes the fetch
//! and the comparison for that triple; it is released when dropped.

use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

/// Exclusive lock held for the lifetime of the value
#[derive(Debug)]
pub struct ArtifactLock {
    _file: File,
}

impl ArtifactLock {
    /// Block until the lock at `path` is held exclusively
    pub fn acquire(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        FileExt::lock_exclusive(&file)?;
        debug!("Locked {}", path.display());

        Ok(Self { _file: file })
    }
}
