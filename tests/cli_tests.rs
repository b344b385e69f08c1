// End-to-end tests for the command-line interface

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bin() -> Command {
    Command::cargo_bin("restic-runner").unwrap()
}

#[test]
fn missing_command_prints_usage_and_fails() {
    bin()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_command_fails_without_touching_anything() {
    bin()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn missing_config_file_is_fatal() {
    bin()
        .args(["--config", "/nonexistent/config.yaml", "--skip-update-check", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn malformed_config_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "not: [valid").unwrap();

    bin()
        .args(["--config", config_path.to_str().unwrap(), "--skip-update-check", "check"])
        .assert()
        .failure();
}

#[test]
fn backup_config_snapshots_the_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_dir = temp_dir.path().join("snapshots");
    let config_path = temp_dir.path().join("config.yaml");

    let config_content = format!(
        r#"
restic:
  path: /usr/bin/restic
  s3_bucket_url: s3.example.com/bucket
backup:
  log_dir: {}
  sources: [/data]
config_backup:
  dir: {}
"#,
        temp_dir.path().join("logs").display(),
        snapshot_dir.display()
    );
    fs::write(&config_path, config_content).unwrap();

    bin()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--skip-update-check",
            "backup-config",
        ])
        .assert()
        .success();

    let copies: Vec<_> = fs::read_dir(&snapshot_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();

    assert_eq!(copies.len(), 1);
    assert!(copies[0].starts_with("config_"));
    assert!(copies[0].ends_with(".yaml"));
}

#[test]
fn backup_config_accepts_the_underscore_alias() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");

    // No config_backup section: the operation is a diagnostic no-op
    let config_content = format!(
        r#"
restic:
  path: /usr/bin/restic
  s3_bucket_url: s3.example.com/bucket
backup:
  log_dir: {}
  sources: [/data]
"#,
        temp_dir.path().join("logs").display()
    );
    fs::write(&config_path, config_content).unwrap();

    bin()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--skip-update-check",
            "backup_config",
        ])
        .assert()
        .success();
}
