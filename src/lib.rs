//! lazydeploy - skip deploying unchanged snapshot artifacts
//!
//! Before a snapshot is deployed, the copy currently published in the
//! remote repositories is fetched into a scratch repository below the build
//! output directory and compared byte for byte with the fresh build. When
//! they are identical the `maven.deploy.skip` build property is set.

pub mod artifact;
pub mod cli;
pub mod compare;
pub mod config;
pub mod detector;
pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod properties;
pub mod repository;
pub mod resolver;
pub mod ui;

pub use error::{LazyDeployError, LazyDeployResult};
