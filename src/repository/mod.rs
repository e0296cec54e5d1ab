//! Repository descriptors and snapshot freshness policies
//!
//! Remote repositories are plain values owned by one invocation. Mutating
//! their policies (see [`force_snapshot_updates`]) never leaks past it.

pub mod layout;
pub mod scratch;

pub use layout::RepositoryLayout;
pub use scratch::{provision, ScratchRepository, ScratchUnavailable, SCRATCH_DIR};

use crate::error::{LazyDeployError, LazyDeployResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How often cached artifacts are revalidated against a remote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UpdatePolicy {
    /// Check on every resolution
    Always,
    /// Check once per (UTC) day
    #[default]
    Daily,
    /// Check when the cached copy is older than N minutes
    Interval(u32),
    /// Never revalidate a cached copy
    Never,
}

impl UpdatePolicy {
    /// Whether a copy last checked at `last_checked` must be revalidated
    pub fn is_due(&self, last_checked: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Daily => last_checked.date_naive() < now.date_naive(),
            Self::Interval(minutes) => {
                now.signed_duration_since(last_checked) >= Duration::minutes(i64::from(*minutes))
            }
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Daily => write!(f, "daily"),
            Self::Interval(minutes) => write!(f, "interval:{}", minutes),
            Self::Never => write!(f, "never"),
        }
    }
}

impl FromStr for UpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always" => Ok(Self::Always),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => other
                .strip_prefix("interval:")
                .and_then(|minutes| minutes.parse().ok())
                .map(Self::Interval)
                .ok_or_else(|| format!("unknown update policy: {}", other)),
        }
    }
}

impl TryFrom<String> for UpdatePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UpdatePolicy> for String {
    fn from(policy: UpdatePolicy) -> Self {
        policy.to_string()
    }
}

/// Whether a repository serves one kind of version, and how fresh it must be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryPolicy {
    pub enabled: bool,
    pub update_policy: UpdatePolicy,
}

impl Default for RepositoryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            update_policy: UpdatePolicy::Daily,
        }
    }
}

/// A remote artifact repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub layout: RepositoryLayout,
    #[serde(default)]
    pub snapshots: RepositoryPolicy,
    #[serde(default)]
    pub releases: RepositoryPolicy,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            layout: RepositoryLayout::Default,
            snapshots: RepositoryPolicy::default(),
            releases: RepositoryPolicy::default(),
        }
    }

    /// Parse `ID=URL` or a bare `URL` (the id then defaults to `remote-N`)
    pub fn parse_spec(spec: &str, index: usize) -> LazyDeployResult<Self> {
        let (id, url) = match spec.split_once('=') {
            Some((id, url)) if !id.contains("://") => (id.trim().to_string(), url.trim()),
            _ => (format!("remote-{}", index), spec.trim()),
        };

        let repository = Self::new(id, url);
        repository.parsed_url()?;
        Ok(repository)
    }

    /// The endpoint as an absolute URL whose path ends with a slash
    pub fn parsed_url(&self) -> LazyDeployResult<Url> {
        let mut url = Url::parse(self.url.trim()).map_err(|e| self.invalid(e.to_string()))?;
        match url.scheme() {
            "file" | "http" | "https" => {}
            other => return Err(self.invalid(format!("unsupported scheme: {}", other))),
        }

        if !url.path().ends_with('/') {
            url.path_segments_mut()
                .map_err(|()| self.invalid("URL cannot be a base".to_string()))?
                .pop_if_empty()
                .push("");
        }
        Ok(url)
    }

    /// `relative` resolved below the endpoint, keeping the endpoint's query
    pub fn url_for(&self, relative: &str) -> LazyDeployResult<Url> {
        let base = self.parsed_url()?;
        let mut url = base
            .join(relative)
            .map_err(|e| self.invalid(format!("cannot resolve {}: {}", relative, e)))?;
        url.set_query(base.query());
        Ok(url)
    }

    fn invalid(&self, reason: String) -> LazyDeployError {
        LazyDeployError::RepositoryInvalid {
            id: self.id.clone(),
            reason,
        }
    }

    /// Policy governing the given kind of version
    pub fn policy_for(&self, snapshot: bool) -> &RepositoryPolicy {
        if snapshot {
            &self.snapshots
        } else {
            &self.releases
        }
    }
}

/// Force every repository to revalidate snapshots on this invocation.
///
/// Deployment is the last stage still fetching snapshots, so any staleness
/// tolerance configured for earlier stages would hide the current remote
/// state.
pub fn force_snapshot_updates(repositories: &mut [RemoteRepository]) {
    for repository in repositories {
        repository.snapshots.update_policy = UpdatePolicy::Always;
    }
}
