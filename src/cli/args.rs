//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lazydeploy - skip deploying snapshots that are already published
///
/// Fetches the currently published copy of a snapshot artifact and compares
/// it byte for byte with the fresh build. When they are identical the
/// `maven.deploy.skip` property is set.
#[derive(Parser, Debug)]
#[command(name = "lazydeploy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LAZYDEPLOY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide whether a snapshot artifact needs deploying
    Check(CheckArgs),

    /// Compare two files byte for byte
    Compare(CompareArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Group id, e.g. org.example
    #[arg(short, long)]
    pub group: String,

    /// Artifact id
    #[arg(short, long)]
    pub name: String,

    /// Version, e.g. 1.0-SNAPSHOT
    #[arg(long, visible_alias = "ver")]
    pub artifact_version: String,

    /// Classifier of the main artifact
    #[arg(long)]
    pub classifier: Option<String>,

    /// Artifact type
    #[arg(short = 't', long = "type", default_value = "jar")]
    pub kind: String,

    /// The freshly built artifact file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Attached artifact (CLASSIFIER:TYPE=PATH, classifier may be empty)
    #[arg(short, long, value_parser = parse_attachment)]
    pub attach: Vec<Attachment>,

    /// Remote repository ([ID=]URL), after those from the configuration
    #[arg(short, long)]
    pub repo: Vec<String>,

    /// Build output directory (default: from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Do not contact remote repositories
    #[arg(long)]
    pub offline: bool,

    /// Properties file receiving maven.deploy.skip
    #[arg(short, long)]
    pub properties: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// First file
    pub left: PathBuf,

    /// Second file
    pub right: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for the check command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// An attached artifact given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub classifier: Option<String>,
    pub kind: String,
    pub file: PathBuf,
}

/// Parse an attachment in CLASSIFIER:TYPE=PATH format
fn parse_attachment(s: &str) -> Result<Attachment, String> {
    let (coords, path) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid CLASSIFIER:TYPE=PATH format: no '=' found in '{s}'"))?;
    let (classifier, kind) = coords
        .split_once(':')
        .ok_or_else(|| format!("invalid CLASSIFIER:TYPE=PATH format: no ':' found in '{s}'"))?;

    if kind.is_empty() {
        return Err(format!("missing type in '{s}'"));
    }
    if path.is_empty() {
        return Err(format!("missing path in '{s}'"));
    }

    Ok(Attachment {
        classifier: (!classifier.is_empty()).then(|| classifier.to_string()),
        kind: kind.to_string(),
        file: PathBuf::from(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_attachment_valid() {
        let a = parse_attachment("sources:jar=target/app-sources.jar").unwrap();
        assert_eq!(a.classifier.as_deref(), Some("sources"));
        assert_eq!(a.kind, "jar");
        assert_eq!(a.file, PathBuf::from("target/app-sources.jar"));
    }

    #[test]
    fn parse_attachment_without_classifier() {
        let a = parse_attachment(":pom=pom.xml").unwrap();
        assert_eq!(a.classifier, None);
        assert_eq!(a.kind, "pom");
    }

    #[test]
    fn parse_attachment_invalid() {
        assert!(parse_attachment("sources:jar").is_err());
        assert!(parse_attachment("sources=a.jar").is_err());
        assert!(parse_attachment("sources:=a.jar").is_err());
        assert!(parse_attachment("sources:jar=").is_err());
    }

    #[test]
    fn cli_parses_check() {
        let cli = Cli::parse_from([
            "lazydeploy",
            "check",
            "--group",
            "org.example",
            "--name",
            "app",
            "--artifact-version",
            "1.0-SNAPSHOT",
            "--file",
            "target/app.jar",
            "--repo",
            "snapshots=https://repo.example.com/snapshots",
            "--attach",
            "sources:jar=target/app-sources.jar",
        ]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.group, "org.example");
                assert_eq!(args.artifact_version, "1.0-SNAPSHOT");
                assert_eq!(args.kind, "jar");
                assert_eq!(args.repo.len(), 1);
                assert_eq!(args.attach.len(), 1);
                assert_eq!(args.format, OutputFormat::Text);
                assert!(!args.offline);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn check_version_flags_stay_distinct() {
        let cli = Cli::parse_from([
            "lazydeploy",
            "check",
            "-g",
            "g",
            "-n",
            "a",
            "--ver",
            "2.0-SNAPSHOT",
            "-f",
            "a.jar",
        ]);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.artifact_version, "2.0-SNAPSHOT"),
            _ => panic!("expected Check command"),
        }

        let err = Cli::try_parse_from(["lazydeploy", "check", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn cli_parses_compare() {
        let cli = Cli::parse_from(["lazydeploy", "compare", "a.jar", "b.jar"]);
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.left, PathBuf::from("a.jar"));
                assert_eq!(args.right, PathBuf::from("b.jar"));
            }
            _ => panic!("expected Compare command"),
        }
    }

    #[test]
    fn cli_parses_config_init_force() {
        let cli = Cli::parse_from(["lazydeploy", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force }),
            }) => assert!(force),
            _ => panic!("expected Config Init command"),
        }
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["lazydeploy", "config"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["lazydeploy", "-v", "config"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["lazydeploy", "-vv", "config"]);
        assert_eq!(cli.verbose, 2);
    }
}
