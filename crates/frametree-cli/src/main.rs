//! `frametree` – frame snapshot diagnostics.
//!
//! Loads a child → parent frame snapshot from a `.json` or `.toml` file and:
//!
//! 1. `check` – lists every structural problem (malformed edges, cycles,
//!    missing or multiple roots); exits with status 1 when any is found.
//! 2. `resolve` – prints the pose of one frame expressed in another.
//! 3. `tree` – prints the frame hierarchy from the root.
//! 4. `config` – shows the effective configuration, or writes the defaults
//!    to `~/.frametree/config.toml` with `--init`.

mod config;
mod error;
mod report;
mod snapshot_file;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, warn};

use frametree_core::{EdgeMap, FrameTree, validate};

use crate::config::{Config, LogFormat};
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "frametree", version, about = "Inspect rigid-body frame tree snapshots")]
struct Cli {
    /// Snapshot file (`.json` or `.toml`); falls back to `default_snapshot`.
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report every structural problem in the snapshot.
    Check,
    /// Print the pose of SOURCE expressed in TARGET's coordinates.
    Resolve {
        source: String,
        target: String,
        /// Project the result onto the ground plane (x, y, yaw).
        #[arg(long)]
        planar: bool,
    },
    /// Print the frame hierarchy.
    Tree,
    /// Show the effective configuration.
    Config {
        /// Write the default configuration file.
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (cfg, config_error) = match config::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&cfg);
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config; using defaults");
    }

    match run(cli, &cfg) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// `RUST_LOG` wins over the configured level; the format comes from the
/// config (`FRAMETREE_LOG_FORMAT=json` for newline-delimited JSON).
fn init_tracing(cfg: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level));

    match cfg.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .init(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn run(cli: Cli, cfg: &Config) -> Result<ExitCode, CliError> {
    let Cli { snapshot, command } = cli;
    match command {
        Command::Config { init } => cmd_config(cfg, init),
        Command::Check => {
            let (path, edges) = load_snapshot(snapshot, cfg)?;
            let problems = validate(&edges);
            if problems.is_empty() {
                let tree = FrameTree::build(&edges)?;
                println!(
                    "{} {} frames, root '{}'",
                    "✓ snapshot OK:".green().bold(),
                    tree.len(),
                    tree.root().to_string().bold()
                );
                return Ok(ExitCode::SUCCESS);
            }
            println!(
                "{} {} problem(s) in {}",
                "✗".red().bold(),
                problems.len(),
                path.display()
            );
            for line in report::diagnostics(&problems) {
                println!("{line}");
            }
            Ok(ExitCode::from(1))
        }
        Command::Resolve {
            source,
            target,
            planar,
        } => {
            let (_, edges) = load_snapshot(snapshot, cfg)?;
            let tree = FrameTree::build(&edges)?;
            println!(
                "{} in {}:",
                source.as_str().bold().cyan(),
                target.as_str().bold().cyan()
            );
            if planar {
                let pose = tree.resolve_planar(&source, &target)?;
                println!("  {}", report::planar(&pose, cfg));
            } else {
                let pose = tree.resolve(&source, &target)?;
                println!("  {}", report::pose(&pose, cfg));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tree => {
            let (_, edges) = load_snapshot(snapshot, cfg)?;
            let tree = FrameTree::build(&edges)?;
            for line in report::hierarchy(&tree) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_snapshot(
    snapshot: Option<PathBuf>,
    cfg: &Config,
) -> Result<(PathBuf, EdgeMap), CliError> {
    let path = snapshot
        .or_else(|| cfg.default_snapshot.clone())
        .ok_or(CliError::NoSnapshot)?;
    debug!(path = %path.display(), "loading snapshot");
    let edges = snapshot_file::load(&path)?;
    Ok((path, edges))
}

fn cmd_config(cfg: &Config, init: bool) -> Result<ExitCode, CliError> {
    if init {
        let path = config::save(&Config::default())?;
        println!(
            "{} Config saved to {}",
            "✓".green().bold(),
            path.display().to_string().bold()
        );
    } else {
        println!("  Config file: {}", config::config_path().display());
        println!("  {cfg:#?}");
    }
    Ok(ExitCode::SUCCESS)
}
