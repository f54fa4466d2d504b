use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pyscope::snapshot::SnapshotStore;

mod cli;

#[derive(Parser)]
#[command(name = "pyscope")]
#[command(about = "Keeps Python static analysis fast by scoping it per workspace folder")]
#[command(version)]
struct Cli {
    /// Override the snapshot store location
    #[arg(long, global = true)]
    snapshots: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch folders and keep analyzer scope settings up to date
    Run {
        /// Folder roots to manage (defaults to the current directory)
        paths: Vec<PathBuf>,
    },

    /// Classify folders once and apply scope settings
    Check {
        /// Folder roots to classify (defaults to the current directory)
        paths: Vec<PathBuf>,
    },

    /// Show analyzer settings and snapshot state per folder
    Status {
        /// Folder roots to inspect (defaults to the current directory)
        paths: Vec<PathBuf>,
    },

    /// Restore folders to their snapshotted settings
    Restore {
        /// Folder roots to restore (defaults to the current directory)
        paths: Vec<PathBuf>,
    },

    /// Write a default pyscope.toml into the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let snapshot_path = cli.snapshots.unwrap_or_else(SnapshotStore::default_path);

    match cli.command {
        Commands::Run { paths } => {
            cli::run::run_command(&folder_paths(paths), &snapshot_path).await?;
        }
        Commands::Check { paths } => {
            cli::check::check_command(&folder_paths(paths), &snapshot_path).await?;
        }
        Commands::Status { paths } => {
            cli::status::status_command(&folder_paths(paths), &snapshot_path).await?;
        }
        Commands::Restore { paths } => {
            cli::restore::restore_command(&folder_paths(paths), &snapshot_path).await?;
        }
        Commands::Init { force } => {
            cli::init::init_command(&std::env::current_dir()?, force)?;
        }
    }

    Ok(())
}

fn folder_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}
