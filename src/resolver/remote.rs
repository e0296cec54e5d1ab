//! Resolver for repositories using the default layout
//!
//! Snapshots are looked up through the version directory's metadata so the
//! latest timestamped upload is fetched, then stored in the scratch
//! repository under the base version name.

use super::metadata::SnapshotMetadata;
use super::transport::{Fetched, Transport};
use super::{ArtifactResolver, ResolveError};
use crate::artifact::{split_timestamped, ArtifactRef};
use crate::repository::{RemoteRepository, ScratchRepository, UpdatePolicy};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default timeout for a single HTTP exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches artifacts from `file://` and `http(s)://` default-layout repositories
pub struct LayoutResolver {
    transport: Transport,
}

impl LayoutResolver {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(timeout, user_agent.into()),
        }
    }

    /// Try one repository. `Ok(Fetched::Missing)` means "ask the next one".
    fn fetch_from(
        &self,
        remote: &RemoteRepository,
        artifact: &ArtifactRef,
        destination: &ScratchRepository,
        target: &Path,
    ) -> Result<Fetched, String> {
        let version = if artifact.is_snapshot() && split_timestamped(artifact.version()).is_none() {
            self.latest_snapshot(remote, artifact, destination)?
        } else {
            artifact.version().to_string()
        };

        let url = remote
            .url_for(&remote.layout.relative_path(artifact, &version))
            .map_err(|e| e.to_string())?;

        debug!("Fetching {} from {} as {}", artifact, remote.id, version);
        self.transport.download(&url, target)
    }

    /// Timestamped version named by the remote's metadata, or the base
    /// version when the remote publishes none
    fn latest_snapshot(
        &self,
        remote: &RemoteRepository,
        artifact: &ArtifactRef,
        destination: &ScratchRepository,
    ) -> Result<String, String> {
        let url = remote
            .url_for(&remote.layout.metadata_path(artifact))
            .map_err(|e| e.to_string())?;

        let Some(xml) = self.transport.read_text(&url)? else {
            debug!("No snapshot metadata for {} in {}", artifact, remote.id);
            return Ok(artifact.base_version());
        };

        let metadata = SnapshotMetadata::parse(&xml)
            .map_err(|e| format!("corrupt metadata from {}: {}", url, e))?;

        let cached = destination
            .path_of(artifact)
            .with_file_name(format!("maven-metadata-{}.xml", remote.id));
        if let Some(parent) = cached.parent() {
            if let Err(e) = fs::create_dir_all(parent).and_then(|()| fs::write(&cached, &xml)) {
                debug!("Could not keep metadata copy {}: {}", cached.display(), e);
            }
        }

        Ok(metadata.remote_version(artifact))
    }
}

impl Default for LayoutResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_TIMEOUT,
            concat!("lazydeploy/", env!("CARGO_PKG_VERSION")),
        )
    }
}

impl ArtifactResolver for LayoutResolver {
    fn resolve(
        &self,
        artifact: &mut ArtifactRef,
        remotes: &[RemoteRepository],
        destination: &ScratchRepository,
    ) -> Result<(), ResolveError> {
        if let Some(missing) = artifact.missing_coordinate() {
            return Err(ResolveError::InvalidArtifact {
                artifact: artifact.to_string(),
                missing,
            });
        }

        let snapshot = artifact.is_snapshot();
        let target = destination.path_of(artifact);
        let mut failures = Vec::new();

        for remote in remotes {
            let policy = remote.policy_for(snapshot);
            if !policy.enabled {
                debug!("Repository {} does not serve this kind of version", remote.id);
                continue;
            }

            if is_fresh(&target, policy.update_policy) {
                debug!("Using cached copy of {} at {}", artifact, target.display());
                artifact.set_file(target);
                return Ok(());
            }

            match self.fetch_from(remote, artifact, destination, &target) {
                Ok(Fetched::Stored) => {
                    artifact.set_file(target);
                    return Ok(());
                }
                Ok(Fetched::Missing) => debug!("{} not found in {}", artifact, remote.id),
                Err(reason) => {
                    debug!("Repository {} failed: {}", remote.id, reason);
                    failures.push(format!("{}: {}", remote.id, reason));
                }
            }
        }

        if failures.is_empty() {
            Err(ResolveError::NotFound {
                artifact: artifact.to_string(),
            })
        } else {
            Err(ResolveError::Failed {
                artifact: artifact.to_string(),
                reason: failures.join("; "),
            })
        }
    }
}

/// A cached copy exists and the policy does not ask for a recheck yet
fn is_fresh(target: &Path, policy: UpdatePolicy) -> bool {
    let Ok(modified) = fs::metadata(target).and_then(|m| m.modified()) else {
        return false;
    };
    !policy.is_due(DateTime::<Utc>::from(modified), Utc::now())
}
