use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub restic: ResticConfig,
    pub backup: BackupConfig,
    #[serde(default)]
    pub purge: PurgeConfig,
    #[serde(default)]
    pub ntfy: Option<NtfyConfig>,
    #[serde(default)]
    pub aws_parameter_store: ParameterStoreConfig,
    #[serde(default)]
    pub config_backup: Option<ConfigBackupConfig>,
}

/// Restic binary and repository settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResticConfig {
    /// Path to the restic binary
    pub path: PathBuf,

    /// S3 bucket URL, without the `s3:` scheme prefix
    pub s3_bucket_url: String,
}

/// Backup operation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Directory for per-operation log files
    pub log_dir: PathBuf,

    /// Source paths to back up, one snapshot each, in order
    pub sources: Vec<PathBuf>,
}

/// Retention policy applied by the purge operation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PurgeConfig {
    #[serde(default = "default_keep_daily")]
    pub keep_daily: u32,
    #[serde(default = "default_keep_weekly")]
    pub keep_weekly: u32,
    #[serde(default = "default_keep_monthly")]
    pub keep_monthly: u32,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            keep_daily: default_keep_daily(),
            keep_weekly: default_keep_weekly(),
            keep_monthly: default_keep_monthly(),
        }
    }
}

/// ntfy push notification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NtfyConfig {
    /// Base URL of the ntfy server
    #[serde(default = "default_ntfy_server")]
    pub server: String,

    /// Topic to publish to
    pub topic: String,
}

/// Names of the secrets read from AWS Systems Manager Parameter Store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParameterStoreConfig {
    /// Parameter holding the colon-delimited S3 credential pair
    #[serde(default = "default_credentials_parameter")]
    pub credentials_parameter: String,

    /// Parameter holding the restic repository passphrase
    #[serde(default = "default_password_parameter")]
    pub password_parameter: String,
}

impl Default for ParameterStoreConfig {
    fn default() -> Self {
        Self {
            credentials_parameter: default_credentials_parameter(),
            password_parameter: default_password_parameter(),
        }
    }
}

/// Destination for configuration file snapshots
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigBackupConfig {
    pub dir: PathBuf,
}

// Default value functions

fn default_keep_daily() -> u32 {
    7
}
fn default_keep_weekly() -> u32 {
    4
}
fn default_keep_monthly() -> u32 {
    6
}
fn default_ntfy_server() -> String {
    "https://ntfy.sh".to_string()
}
fn default_credentials_parameter() -> String {
    "restic_s3_credentials".to_string()
}
fn default_password_parameter() -> String {
    "restic_password".to_string()
}
