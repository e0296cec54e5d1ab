//! Build-step orchestration: decide, then mark the deployment as skipped

use crate::artifact::ArtifactRef;
use crate::detector::{self, Decision};
use crate::error::LazyDeployResult;
use crate::properties::BuildProperties;
use crate::repository::RemoteRepository;
use crate::resolver::ArtifactResolver;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Property consulted by the deploy step
pub const DEPLOY_SKIP_PROPERTY: &str = "maven.deploy.skip";

/// Verdict for one artifact of the build
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutcome {
    pub artifact: String,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Result of one lazydeploy run
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub skip_deploy: bool,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl Outcome {
    /// Decision for the main artifact
    pub fn decision(&self) -> Option<Decision> {
        self.artifacts.first().map(|a| a.decision)
    }
}

/// One lazydeploy invocation over a main artifact and its attachments
pub struct LazyDeploy<'a, R: ArtifactResolver + ?Sized> {
    artifact: ArtifactRef,
    attached: Vec<ArtifactRef>,
    remotes: Vec<RemoteRepository>,
    output_dir: PathBuf,
    offline: bool,
    resolver: &'a R,
}

impl<'a, R: ArtifactResolver + ?Sized> LazyDeploy<'a, R> {
    pub fn new(
        artifact: ArtifactRef,
        remotes: Vec<RemoteRepository>,
        output_dir: impl Into<PathBuf>,
        resolver: &'a R,
    ) -> Self {
        Self {
            artifact,
            attached: Vec::new(),
            remotes,
            output_dir: output_dir.into(),
            offline: false,
            resolver,
        }
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_attached(mut self, attached: Vec<ArtifactRef>) -> Self {
        self.attached = attached;
        self
    }

    /// Remote repositories, with any policy changes made by the run
    pub fn remotes(&self) -> &[RemoteRepository] {
        &self.remotes
    }

    /// Check the main artifact and, when it is unchanged, every attachment.
    ///
    /// Sets [`DEPLOY_SKIP_PROPERTY`] only when all of them are unchanged.
    pub fn execute(&mut self, properties: &mut BuildProperties) -> LazyDeployResult<Outcome> {
        let main = detector::decide(
            &self.artifact,
            &mut self.remotes,
            &self.output_dir,
            self.offline,
            self.resolver,
        )?;

        let mut artifacts = vec![ArtifactOutcome {
            artifact: self.artifact.to_string(),
            decision: main,
        }];

        if !main.is_unchanged() {
            debug!("{} is {}", self.artifact, main);
            return Ok(Outcome {
                skip_deploy: false,
                artifacts,
            });
        }

        // Policies are already forced and scratch exists after the main check
        let scratch = detector::scratch_repository(&self.output_dir);
        for attachment in &self.attached {
            let decision =
                detector::detect_change(attachment, &self.remotes, scratch.as_ref(), self.resolver)?;
            debug!("{} is {}", attachment, decision);
            artifacts.push(ArtifactOutcome {
                artifact: attachment.to_string(),
                decision,
            });
            if !decision.is_unchanged() {
                return Ok(Outcome {
                    skip_deploy: false,
                    artifacts,
                });
            }
        }

        info!("Skip deployment of unchanged artifact {}", self.artifact);
        properties.set(DEPLOY_SKIP_PROPERTY, "true");

        Ok(Outcome {
            skip_deploy: true,
            artifacts,
        })
    }
}
