//! Fetching a published artifact into the scratch repository
//!
//! The change detector only depends on [`ArtifactResolver`]. Two failure
//! kinds are expected and recoverable ([`ResolveError::NotFound`],
//! [`ResolveError::Failed`]); anything else is a fault the build must see.

pub mod metadata;
pub mod remote;
mod transport;

pub use metadata::{SnapshotMetadata, SnapshotVersion};
pub use remote::LayoutResolver;

use crate::artifact::ArtifactRef;
use crate::repository::{RemoteRepository, ScratchRepository};
use thiserror::Error;

/// Errors reported by an [`ArtifactResolver`]
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{artifact} was not found in any remote repository")]
    NotFound { artifact: String },

    #[error("Failed to resolve {artifact}: {reason}")]
    Failed { artifact: String, reason: String },

    #[error("Invalid artifact {artifact}: missing {missing}")]
    InvalidArtifact {
        artifact: String,
        missing: &'static str,
    },
}

/// Locates an artifact in remote repositories and stores it locally
pub trait ArtifactResolver {
    /// Fetch `artifact` from `remotes` (in order, first success wins) into
    /// `destination`, then record the stored file on `artifact`.
    fn resolve(
        &self,
        artifact: &mut ArtifactRef,
        remotes: &[RemoteRepository],
        destination: &ScratchRepository,
    ) -> Result<(), ResolveError>;
}
