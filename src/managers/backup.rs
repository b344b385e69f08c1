//! Operation handlers - compose secrets, command runner and notifier

use crate::config::Config;
use crate::managers::notification::{Notifier, NtfyNotifier, Priority};
use crate::utils::command::{CommandRunner, FileLogRunner, RunOutcome};
use crate::utils::restic::{self, ResticEnv, S3Credentials};
use crate::utils::ssm::{SecretProvider, SsmSecretProvider};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

pub struct BackupManager {
    config: Config,
    secrets: Box<dyn SecretProvider>,
    runner: Box<dyn CommandRunner>,
    notifier: Box<dyn Notifier>,
}

impl BackupManager {
    /// Create a manager wired to SSM, the file-logging runner and ntfy
    pub fn new(config: Config) -> Self {
        let runner = FileLogRunner::new(config.backup.log_dir.clone());
        let notifier = NtfyNotifier::from_config(config.ntfy.as_ref());

        Self {
            config,
            secrets: Box::new(SsmSecretProvider::new()),
            runner: Box::new(runner),
            notifier: Box::new(notifier),
        }
    }

    /// Create a manager with explicit collaborators (used by tests)
    pub fn with_parts(
        config: Config,
        secrets: Box<dyn SecretProvider>,
        runner: Box<dyn CommandRunner>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            secrets,
            runner,
            notifier,
        }
    }

    /// Fetch both secrets and build the restic environment overlay.
    ///
    /// On any missing or malformed secret, sends exactly one high-priority
    /// failure notification and returns `None`; the operation must not touch
    /// the external binary in that case.
    fn fetch_restic_env(&self, failure_title: &str) -> Option<ResticEnv> {
        let store = &self.config.aws_parameter_store;
        let credentials = self.secrets.get_secret(&store.credentials_parameter);
        let password = self.secrets.get_secret(&store.password_parameter);

        let (Some(credentials), Some(password)) = (credentials, password) else {
            error!("Could not fetch secrets from the parameter store, aborting");
            self.notifier.notify(
                failure_title,
                "Failed to fetch secrets from the AWS Parameter Store.",
                Priority::High,
            );
            return None;
        };

        match S3Credentials::parse(&credentials) {
            Ok(credentials) => Some(ResticEnv::new(&credentials, &password)),
            Err(e) => {
                error!("Invalid credential parameter: {:#}", e);
                self.notifier.notify(
                    failure_title,
                    "The S3 credential parameter is malformed.",
                    Priority::High,
                );
                None
            }
        }
    }

    /// Back up every configured source, one snapshot per source.
    ///
    /// All sources are attempted even after a failure; any single failure
    /// marks the whole operation failed. Returns overall success.
    pub fn backup(&self) -> bool {
        info!("Starting backup to S3...");

        let Some(env) = self.fetch_restic_env("Backup failed") else {
            return false;
        };

        if self.config.backup.sources.is_empty() {
            warn!("No backup sources configured");
        }

        let mut success = true;
        for source in &self.config.backup.sources {
            let args = restic::backup_args(&self.config.restic.s3_bucket_url, source);
            let outcome = self
                .runner
                .run(&self.config.restic.path, &args, "backup", env.vars());

            if let RunOutcome::Failed { reason } = outcome {
                error!("Backup of {:?} failed: {}", source, reason);
                success = false;
            }
        }

        if success {
            self.notifier.notify(
                "Backup finished",
                "Backup to S3 completed successfully.",
                Priority::Default,
            );
        } else {
            self.notifier.notify(
                "Backup failed",
                "One or more sources failed to back up. Check the logs.",
                Priority::High,
            );
        }

        success
    }

    /// Run a repository integrity check
    pub fn check(&self) -> bool {
        info!("Starting repository integrity check...");

        let Some(env) = self.fetch_restic_env("Check failed") else {
            return false;
        };

        let args = restic::check_args(&self.config.restic.s3_bucket_url);
        let outcome = self
            .runner
            .run(&self.config.restic.path, &args, "check", env.vars());

        match outcome {
            RunOutcome::Success => {
                self.notifier.notify(
                    "Check finished",
                    "Repository integrity check passed.",
                    Priority::Default,
                );
                true
            }
            RunOutcome::Failed { reason } => {
                error!("Repository check failed: {}", reason);
                self.notifier.notify(
                    "Check failed",
                    "Repository integrity check failed. Check the logs.",
                    Priority::High,
                );
                false
            }
        }
    }

    /// Apply the retention policy and reclaim storage
    pub fn purge(&self) -> bool {
        info!("Starting retention pruning...");

        let Some(env) = self.fetch_restic_env("Purge failed") else {
            return false;
        };

        let args = restic::forget_args(&self.config.restic.s3_bucket_url, &self.config.purge);
        let outcome = self
            .runner
            .run(&self.config.restic.path, &args, "purge", env.vars());

        match outcome {
            RunOutcome::Success => {
                self.notifier.notify(
                    "Purge finished",
                    "Old snapshots pruned and storage reclaimed.",
                    Priority::Default,
                );
                true
            }
            RunOutcome::Failed { reason } => {
                error!("Retention pruning failed: {}", reason);
                self.notifier.notify(
                    "Purge failed",
                    "Retention pruning failed. Check the logs.",
                    Priority::High,
                );
                false
            }
        }
    }

    /// Snapshot the configuration file itself into the configured directory.
    ///
    /// Purely local file I/O: no secrets, no external binary, no notification.
    /// An unset `config_backup` section makes this a diagnostic no-op.
    pub fn backup_config(&self, config_path: &Path) -> Result<()> {
        let Some(config_backup) = &self.config.config_backup else {
            warn!("config_backup.dir is not set, skipping configuration snapshot");
            return Ok(());
        };

        fs::create_dir_all(&config_backup.dir).with_context(|| {
            format!("Failed to create snapshot directory: {:?}", config_backup.dir)
        })?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let destination = config_backup.dir.join(format!("config_{}.yaml", timestamp));

        fs::copy(config_path, &destination).with_context(|| {
            format!("Failed to copy {:?} to {:?}", config_path, destination)
        })?;

        info!("Configuration snapshot written to {:?}", destination);
        Ok(())
    }
}
