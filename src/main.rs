//! lazydeploy - skip deploying unchanged snapshot artifacts
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use lazydeploy::cli::{Cli, Commands};
use lazydeploy::config::{Config, ConfigManager};
use lazydeploy::error::LazyDeployResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> LazyDeployResult<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        // Comparison needs no configuration
        Commands::Compare(args) => {
            init_logging(cli.verbose, false);
            lazydeploy::cli::commands::compare(args)
        }
        Commands::Check(args) => {
            let (config, _) = load_config(cli.config, cli.verbose)?;
            lazydeploy::cli::commands::check(args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => {
            let (config, config_manager) = load_config(cli.config, cli.verbose)?;
            lazydeploy::cli::commands::config(args, &config, &config_manager)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load configuration, then start logging in the configured format
fn load_config(path: Option<PathBuf>, verbose: u8) -> LazyDeployResult<(Config, ConfigManager)> {
    let config_manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;
    init_logging(verbose, config.general.log_format == "json");
    Ok((config, config_manager))
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("lazydeploy=warn"),
        1 => EnvFilter::new("lazydeploy=info"),
        _ => EnvFilter::new("lazydeploy=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
