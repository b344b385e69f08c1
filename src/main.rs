mod config;
mod managers;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use managers::backup::BackupManager;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "restic-runner")]
#[command(about = "Backup orchestration wrapping restic against an S3 repository", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Skip the startup release-metadata check
    #[arg(long)]
    skip_update_check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up every configured source to the S3 repository
    Backup,

    /// Check repository integrity
    Check,

    /// Prune old snapshots per the retention policy and reclaim storage
    Purge,

    /// Snapshot the configuration file into the configured directory
    #[command(name = "backup-config", alias = "backup_config")]
    BackupConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    managers::logging::init_console_logging();

    // Config is loaded exactly once; a missing or malformed file is fatal
    let config = config::load_config(&cli.config)?;

    if !cli.skip_update_check {
        utils::update::check_for_update();
    }

    let manager = BackupManager::new(config);

    // Command failures are reported via logs and notifications; the process
    // still completes normally. Only local I/O errors from the config
    // snapshot propagate.
    match cli.command {
        Commands::Backup => {
            manager.backup();
        }
        Commands::Check => {
            manager.check();
        }
        Commands::Purge => {
            manager.purge();
        }
        Commands::BackupConfig => {
            manager.backup_config(&cli.config)?;
        }
    }

    Ok(())
}
