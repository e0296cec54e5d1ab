//! Check command - decide whether a snapshot needs deploying

use crate::artifact::ArtifactRef;
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::Config;
use crate::error::LazyDeployResult;
use crate::lifecycle::{LazyDeploy, Outcome, DEPLOY_SKIP_PROPERTY};
use crate::properties::BuildProperties;
use crate::repository::RemoteRepository;
use crate::resolver::LayoutResolver;
use crate::ui::{self, UiContext};
use std::path::Path;
use tracing::debug;

/// Execute the check command
pub fn execute(args: CheckArgs, config: &Config) -> LazyDeployResult<()> {
    let mut artifact = ArtifactRef::new(&args.group, &args.name, &args.artifact_version)
        .with_type(&args.kind)
        .with_file(&args.file);
    if let Some(classifier) = &args.classifier {
        artifact = artifact.with_classifier(classifier);
    }

    let attached = args
        .attach
        .iter()
        .map(|a| artifact.attached(a.classifier.as_deref(), &a.kind, &a.file))
        .collect();

    let remotes = repositories(config, &args.repo)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.general.output_dir.clone());
    let offline = args.offline || config.general.offline;

    let mut properties = BuildProperties::new();
    let resolver = LayoutResolver::new(config.http.timeout(), config.http.user_agent.clone());
    let outcome = LazyDeploy::new(artifact, remotes, output_dir, &resolver)
        .with_attached(attached)
        .offline(offline)
        .execute(&mut properties)?;

    if let Some(path) = &args.properties {
        merge_properties(path, &properties)?;
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_outcome(&outcome),
    }

    Ok(())
}

/// Configured repositories followed by those given on the command line
fn repositories(config: &Config, specs: &[String]) -> LazyDeployResult<Vec<RemoteRepository>> {
    let mut remotes = config.repositories.clone();
    for spec in specs {
        let index = remotes.len() + 1;
        remotes.push(RemoteRepository::parse_spec(spec, index)?);
    }
    Ok(remotes)
}

/// Merge `produced` into the properties file at `path`.
///
/// The file is left untouched, and not even read, when nothing was produced.
fn merge_properties(path: &Path, produced: &BuildProperties) -> LazyDeployResult<()> {
    if produced.is_empty() {
        return Ok(());
    }

    let mut properties = BuildProperties::load(path)?;
    properties.extend(produced);
    properties.save(path)?;
    debug!("Wrote {} to {}", DEPLOY_SKIP_PROPERTY, path.display());
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    let ctx = UiContext::detect();

    for entry in &outcome.artifacts {
        ui::key_value_status(
            &ctx,
            &entry.artifact,
            &entry.decision.to_string(),
            entry.decision.is_unchanged(),
        );
    }

    if outcome.skip_deploy {
        ui::step_ok_detail(&ctx, "Deployment skipped", &format!("{}=true", DEPLOY_SKIP_PROPERTY));
    } else {
        ui::step_warn(&ctx, "Deployment required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_line_repositories_follow_config() {
        let mut config = Config::default();
        config
            .repositories
            .push(RemoteRepository::new("central", "https://repo.example.com/releases"));

        let remotes = repositories(
            &config,
            &[
                "snapshots=https://repo.example.com/snapshots".to_string(),
                "file:///srv/maven".to_string(),
            ],
        )
        .unwrap();

        let ids: Vec<_> = remotes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["central", "snapshots", "remote-3"]);
    }

    #[test]
    fn bad_repository_spec_fails() {
        assert!(repositories(&Config::default(), &["ftp://example.com".to_string()]).is_err());
    }

    #[test]
    fn nothing_produced_skips_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build.properties");
        fs::write(&path, "not a property line\n").unwrap();

        merge_properties(&path, &BuildProperties::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "not a property line\n");
    }

    #[test]
    fn skip_flag_merges_into_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build.properties");
        fs::write(&path, "project.name=app\n").unwrap();

        let mut produced = BuildProperties::new();
        produced.set(DEPLOY_SKIP_PROPERTY, "true");
        merge_properties(&path, &produced).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "maven.deploy.skip=true\nproject.name=app\n"
        );
    }

    #[test]
    fn skip_flag_still_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build.properties");
        fs::write(&path, "not a property line\n").unwrap();

        let mut produced = BuildProperties::new();
        produced.set(DEPLOY_SKIP_PROPERTY, "true");

        assert!(merge_properties(&path, &produced).is_err());
    }
}
