//! Release metadata check against the current crate version
//!
//! Read-only: compares the published `tag_name` with the version compiled into
//! the binary and logs the result. No download or self-update logic.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

const RELEASE_METADATA_URL: &str =
    "https://api.github.com/repos/restic-runner/restic-runner/releases/latest";

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Best-effort update check. Any failure is logged at debug and ignored.
pub fn check_for_update() {
    match fetch_latest_version() {
        Ok(latest) => {
            if is_newer(CURRENT_VERSION, &latest) {
                info!(
                    "A newer restic-runner release is available: {} (running {})",
                    latest, CURRENT_VERSION
                );
            } else {
                debug!("restic-runner {} is up to date", CURRENT_VERSION);
            }
        }
        Err(e) => debug!("Update check skipped: {:#}", e),
    }
}

fn fetch_latest_version() -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("restic-runner/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(RELEASE_METADATA_URL)
        .send()
        .context("Failed to fetch release metadata")?;

    if !response.status().is_success() {
        anyhow::bail!("Release metadata endpoint returned {}", response.status());
    }

    let body: serde_json::Value = response.json().context("Failed to parse release metadata")?;
    let tag = body["tag_name"]
        .as_str()
        .context("Release metadata has no tag_name")?;

    Ok(tag.trim_start_matches('v').to_string())
}

/// Numeric dot-separated comparison; non-numeric segments compare as zero
fn is_newer(current: &str, latest: &str) -> bool {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect()
    };

    let current = parse(current);
    let latest = parse(latest);
    let len = current.len().max(latest.len());

    for i in 0..len {
        let c = current.get(i).copied().unwrap_or(0);
        let l = latest.get(i).copied().unwrap_or(0);
        if l != c {
            return l > c;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_versions_are_detected() {
        assert!(is_newer("0.1.0", "0.2.0"));
        assert!(is_newer("0.1.0", "1.0.0"));
        assert!(is_newer("0.1.0", "0.1.1"));
        assert!(is_newer("0.1", "0.1.1"));
    }

    #[test]
    fn same_or_older_versions_are_not() {
        assert!(!is_newer("0.1.0", "0.1.0"));
        assert!(!is_newer("0.2.0", "0.1.9"));
        assert!(!is_newer("1.0.0", "0.9.9"));
        assert!(!is_newer("0.1.0", "0.1"));
    }

    #[test]
    fn garbage_segments_compare_as_zero() {
        assert!(!is_newer("0.1.0", "abc"));
        assert!(is_newer("0.1.0", "0.1.0.1"));
    }
}
