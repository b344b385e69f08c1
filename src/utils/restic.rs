//! Restic argument and environment construction

use crate::config::PurgeConfig;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;

/// Environment variables for one restic invocation.
///
/// Held only for the duration of a single command; never written into the
/// ambient process environment.
pub struct ResticEnv {
    vars: HashMap<String, String>,
}

impl ResticEnv {
    pub fn new(credentials: &S3Credentials, password: &str) -> Self {
        let mut vars = HashMap::new();
        vars.insert(
            "AWS_ACCESS_KEY_ID".to_string(),
            credentials.access_key_id.clone(),
        );
        vars.insert(
            "AWS_SECRET_ACCESS_KEY".to_string(),
            credentials.secret_access_key.clone(),
        );
        vars.insert("RESTIC_PASSWORD".to_string(), password.to_string());
        Self { vars }
    }

    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }
}

/// S3 credential pair, stored colon-delimited in the parameter store
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl S3Credentials {
    /// Parse an `access-key:secret-key` pair
    pub fn parse(raw: &str) -> Result<Self> {
        let Some((access_key_id, secret_access_key)) = raw.split_once(':') else {
            bail!("credential parameter is not a colon-delimited pair");
        };
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            bail!("credential parameter has an empty access key or secret key");
        }
        Ok(Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        })
    }
}

/// Repository selection flags shared by every subcommand
fn repository_args(bucket_url: &str) -> Vec<String> {
    vec!["-r".to_string(), format!("s3:{}", bucket_url)]
}

/// Arguments for backing up a single source path
pub fn backup_args(bucket_url: &str, source: &Path) -> Vec<String> {
    let mut args = repository_args(bucket_url);
    args.push("backup".to_string());
    args.push(source.display().to_string());
    args
}

/// Arguments for a repository integrity check
pub fn check_args(bucket_url: &str) -> Vec<String> {
    let mut args = repository_args(bucket_url);
    args.push("check".to_string());
    args
}

/// Arguments for retention pruning: forget old snapshots, then reclaim storage
pub fn forget_args(bucket_url: &str, purge: &PurgeConfig) -> Vec<String> {
    let daily = purge.keep_daily.to_string();
    let weekly = purge.keep_weekly.to_string();
    let monthly = purge.keep_monthly.to_string();

    let mut args = repository_args(bucket_url);
    for arg in [
        "forget",
        "--keep-daily",
        daily.as_str(),
        "--keep-weekly",
        weekly.as_str(),
        "--keep-monthly",
        monthly.as_str(),
        "--prune",
    ] {
        args.push(arg.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn backup_args_target_one_source() {
        let args = backup_args("s3.amazonaws.com/my-backups", &PathBuf::from("/etc"));
        assert_eq!(args, vec!["-r", "s3:s3.amazonaws.com/my-backups", "backup", "/etc"]);
    }

    #[test]
    fn check_args_select_repository() {
        let args = check_args("s3.example.com/bucket");
        assert_eq!(args, vec!["-r", "s3:s3.example.com/bucket", "check"]);
    }

    #[test]
    fn forget_args_carry_retention_counts_and_prune() {
        let purge = PurgeConfig {
            keep_daily: 7,
            keep_weekly: 4,
            keep_monthly: 6,
        };
        let args = forget_args("s3.example.com/bucket", &purge);
        assert_eq!(
            args,
            vec![
                "-r",
                "s3:s3.example.com/bucket",
                "forget",
                "--keep-daily",
                "7",
                "--keep-weekly",
                "4",
                "--keep-monthly",
                "6",
                "--prune",
            ]
        );
    }

    #[test]
    fn credentials_parse_colon_pair() {
        let creds = S3Credentials::parse("AKIAEXAMPLE:wJalrXUt/secret").unwrap();
        assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key, "wJalrXUt/secret");
    }

    #[test]
    fn credentials_reject_malformed_values() {
        assert!(S3Credentials::parse("no-delimiter").is_err());
        assert!(S3Credentials::parse(":secret-only").is_err());
        assert!(S3Credentials::parse("key-only:").is_err());
    }

    #[test]
    fn restic_env_holds_credential_variables() {
        let creds = S3Credentials::parse("AKIA:secret").unwrap();
        let env = ResticEnv::new(&creds, "hunter2");
        assert_eq!(env.vars().get("AWS_ACCESS_KEY_ID").unwrap(), "AKIA");
        assert_eq!(env.vars().get("AWS_SECRET_ACCESS_KEY").unwrap(), "secret");
        assert_eq!(env.vars().get("RESTIC_PASSWORD").unwrap(), "hunter2");
    }
}
