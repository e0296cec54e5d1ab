//! Change detection: is the freshly built snapshot already published?
//!
//! The detector walks four checkpoints and stops at the first one that
//! cannot prove equality:
//!
//! | Checkpoint | "Changed" when |
//! |------------|----------------|
//! | Guard | no scratch repository is available |
//! | Fetch | the remote copy is not found, or resolution fails |
//! | Validate | the resolver reports success but left no file |
//! | Compare | sizes or bytes differ, or a file cannot be read |
//!
//! Only resolver faults outside the two expected kinds escape as errors.

use crate::artifact::ArtifactRef;
use crate::compare::compare_files;
use crate::error::{LazyDeployError, LazyDeployResult};
use crate::lock::ArtifactLock;
use crate::repository::{force_snapshot_updates, provision, RemoteRepository, ScratchRepository};
use crate::resolver::{ArtifactResolver, ResolveError};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Why the check did not run at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inapplicable {
    Offline,
    NotSnapshot,
}

/// Why an artifact counts as changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    ScratchUnavailable,
    LocalFileMissing,
    NotFound,
    ResolutionFailed,
    FetchedFileMissing,
    ContentDiffers,
}

/// Verdict for one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Inapplicable(Inapplicable),
    Changed(ChangeReason),
    Unchanged,
}

impl Decision {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Changed(reason) => {
                let reason = match reason {
                    ChangeReason::ScratchUnavailable => "scratch repository unavailable",
                    ChangeReason::LocalFileMissing => "local artifact file missing",
                    ChangeReason::NotFound => "not published yet",
                    ChangeReason::ResolutionFailed => "remote copy could not be fetched",
                    ChangeReason::FetchedFileMissing => "fetched copy missing",
                    ChangeReason::ContentDiffers => "content differs",
                };
                write!(f, "changed ({})", reason)
            }
            Self::Inapplicable(Inapplicable::Offline) => write!(f, "skipped (offline)"),
            Self::Inapplicable(Inapplicable::NotSnapshot) => write!(f, "skipped (not a snapshot)"),
        }
    }
}

/// Decide whether `artifact` is identical to its published snapshot.
///
/// Offline runs and non-snapshot versions return immediately without
/// touching the filesystem or the remotes. Otherwise the remotes' snapshot
/// policies are forced to "always", the scratch repository below
/// `output_dir` is provisioned, and the artifact is checked.
pub fn decide<R>(
    artifact: &ArtifactRef,
    remotes: &mut [RemoteRepository],
    output_dir: &Path,
    offline: bool,
    resolver: &R,
) -> LazyDeployResult<Decision>
where
    R: ArtifactResolver + ?Sized,
{
    if let Some(reason) = inapplicable(artifact, offline) {
        return Ok(Decision::Inapplicable(reason));
    }

    force_snapshot_updates(remotes);
    let scratch = scratch_repository(output_dir);
    detect_change(artifact, remotes, scratch.as_ref(), resolver)
}

/// Early-exit conditions, checked before any side effect
pub fn inapplicable(artifact: &ArtifactRef, offline: bool) -> Option<Inapplicable> {
    if offline {
        Some(Inapplicable::Offline)
    } else if !artifact.is_snapshot() {
        Some(Inapplicable::NotSnapshot)
    } else {
        None
    }
}

/// Provision the scratch repository, logging why it is unavailable
pub fn scratch_repository(output_dir: &Path) -> Option<ScratchRepository> {
    provision(output_dir)
        .map_err(|e| debug!("Scratch repository unavailable: {}", e))
        .ok()
}

/// Run the detector checkpoints for one artifact
pub fn detect_change<R>(
    artifact: &ArtifactRef,
    remotes: &[RemoteRepository],
    scratch: Option<&ScratchRepository>,
    resolver: &R,
) -> LazyDeployResult<Decision>
where
    R: ArtifactResolver + ?Sized,
{
    let Some(scratch) = scratch else {
        return Ok(Decision::Changed(ChangeReason::ScratchUnavailable));
    };

    let Some(local) = artifact.file().filter(|f| f.is_file()) else {
        debug!("{} has no local file", artifact);
        return Ok(Decision::Changed(ChangeReason::LocalFileMissing));
    };

    let _lock = match ArtifactLock::acquire(&scratch.lock_path(artifact)) {
        Ok(lock) => Some(lock),
        Err(e) => {
            warn!("Checking {} without a lock: {}", artifact, e);
            None
        }
    };

    let mut copy = artifact.unresolved_copy();
    match resolver.resolve(&mut copy, remotes, scratch) {
        Ok(()) => {}
        Err(ResolveError::NotFound { .. }) => {
            debug!("{} not found remotely", artifact);
            return Ok(Decision::Changed(ChangeReason::NotFound));
        }
        Err(e @ ResolveError::Failed { .. }) => {
            debug!("{}", e);
            return Ok(Decision::Changed(ChangeReason::ResolutionFailed));
        }
        Err(e) => return Err(LazyDeployError::Resolver(e)),
    }

    let fetched = match copy.file() {
        Some(file) if file.exists() => file,
        _ => {
            debug!("Resolver reported {} but left no file", copy);
            return Ok(Decision::Changed(ChangeReason::FetchedFileMissing));
        }
    };

    if compare_files(fetched, local) == 0 {
        Ok(Decision::Unchanged)
    } else {
        debug!("{} differs from {}", local.display(), fetched.display());
        Ok(Decision::Changed(ChangeReason::ContentDiffers))
    }
}
