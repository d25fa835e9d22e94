//! `fetchguard` - classify saved HTTP responses as genuine or soft failures.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fetchguard_core::{DetectorConfig, ResponseSnapshot};
use fetchguard_detect::{CheckId, Pipeline, Verdict};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Exit status for a response judged to be a soft failure.
const EXIT_INVALID: u8 = 2;

/// Response-validity checks for saved fetches
#[derive(Parser, Debug)]
#[command(name = "fetchguard", version, about = "Detect soft failures in fetched responses")]
pub struct Cli {
    /// Path to detector configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands for fetchguard
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a response snapshot (JSON file, or `-` for stdin)
    Check {
        /// Snapshot to evaluate
        snapshot: PathBuf,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        /// Disable a check by name (repeatable)
        #[arg(long, value_name = "CHECK")]
        skip: Vec<CheckId>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fetchguard=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Explicit file if given, else the platform config path, else defaults.
/// Environment overrides are applied last.
fn resolve_config(explicit: Option<&Path>) -> Result<DetectorConfig> {
    let mut config = match explicit {
        Some(path) => DetectorConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DetectorConfig::load().context("Failed to load default config")?,
    };
    config.apply_env_overrides();
    Ok(config)
}

fn read_snapshot(path: &Path) -> Result<ResponseSnapshot> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read snapshot from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Snapshot is not valid JSON")
}

fn build_pipeline(config: DetectorConfig, skip: &[CheckId]) -> Result<Pipeline> {
    let pipeline = Pipeline::new(config).context("Invalid detector configuration")?;
    Ok(skip.iter().fold(pipeline, |pipeline, id| pipeline.without(*id)))
}

fn render_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Valid => "valid".to_string(),
        Verdict::Invalid {
            check,
            category,
            reason,
        } => format!("invalid [{category}/{check}]: {reason}"),
    }
}

fn exit_code(verdict: &Verdict) -> ExitCode {
    if verdict.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            snapshot,
            json,
            skip,
        } => {
            let pipeline = build_pipeline(config, &skip)?;
            let snapshot = read_snapshot(&snapshot)?;
            let verdict = pipeline.evaluate(&snapshot);

            info!(
                valid = verdict.is_valid(),
                check = ?verdict.failed_check(),
                "Evaluated snapshot"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("{}", render_verdict(&verdict));
            }
            Ok(exit_code(&verdict))
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    run(Cli::parse())
}
