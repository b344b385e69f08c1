//! Restic Runner Library
//!
//! Orchestrates a restic binary against an S3 repository: backup, integrity
//! check, retention pruning, and configuration snapshots, with secrets from
//! AWS Parameter Store and ntfy push notifications.

pub mod config;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, Config, ConfigError};
pub use managers::backup::BackupManager;
pub use managers::logging::init_console_logging;
pub use managers::notification::{Notifier, NtfyNotifier, Priority};
pub use utils::command::{CommandRunner, FileLogRunner, RunOutcome};
pub use utils::ssm::{SecretProvider, SsmSecretProvider};
