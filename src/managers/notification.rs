//! ntfy push notification manager
//!
//! Sends a titled message to a configured topic. Best-effort and
//! fire-and-forget: failures are logged and never reach the caller.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::NtfyConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ntfy message priority, sent as the `Priority` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Default,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Default => "default",
            Priority::High => "high",
        }
    }
}

/// Outbound notification channel
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, priority: Priority);
}

/// Notifier posting to `<server>/<topic>`.
///
/// Constructed from the optional `ntfy` config section; when the section is
/// absent every notification is skipped with a diagnostic.
pub struct NtfyNotifier {
    config: Option<NtfyConfig>,
    client: reqwest::blocking::Client,
}

impl NtfyNotifier {
    pub fn from_config(config: Option<&NtfyConfig>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build ntfy client, using defaults: {}", e);
                reqwest::blocking::Client::new()
            });

        Self {
            config: config.cloned(),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn send(&self, config: &NtfyConfig, title: &str, message: &str, priority: Priority) -> Result<()> {
        let url = format!(
            "{}/{}",
            config.server.trim_end_matches('/'),
            config.topic.trim_start_matches('/')
        );

        let response = self
            .client
            .post(url)
            .header("Title", title)
            .header("Priority", priority.as_str())
            .body(message.to_string())
            .send()
            .context("Failed to send ntfy request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("ntfy returned status {}: {}", status, body);
        }

        Ok(())
    }
}

impl Notifier for NtfyNotifier {
    fn notify(&self, title: &str, message: &str, priority: Priority) {
        let Some(config) = &self.config else {
            debug!("ntfy is not configured, skipping notification: {}", title);
            return;
        };

        match self.send(config, title, message, priority) {
            Ok(()) => info!("Notification sent: {} - {}", title, message),
            Err(e) => warn!("Failed to send notification '{}': {:#}", title, e),
        }
    }
}

/// A mock notifier for tests that records every notification
pub mod mock {
    use super::{Notifier, Priority};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct SentNotification {
        pub title: String,
        pub message: String,
        pub priority: Priority,
    }

    #[derive(Clone, Default)]
    pub struct MockNotifier {
        pub sent: Arc<Mutex<Vec<SentNotification>>>,
    }

    impl MockNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_sent(&self) -> Vec<SentNotification> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Notifier for MockNotifier {
        fn notify(&self, title: &str, message: &str, priority: Priority) {
            self.sent.lock().unwrap().push(SentNotification {
                title: title.to_string(),
                message: message.to_string(),
                priority,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_header_values() {
        assert_eq!(Priority::Default.as_str(), "default");
        assert_eq!(Priority::High.as_str(), "high");
    }

    #[test]
    fn notifier_without_config_is_disabled() {
        let notifier = NtfyNotifier::from_config(None);
        assert!(!notifier.is_configured());
        // Skips silently instead of failing
        notifier.notify("Backup finished", "done", Priority::Default);
    }

    #[test]
    fn notifier_with_config_is_enabled() {
        let config = NtfyConfig {
            server: "https://ntfy.sh".to_string(),
            topic: "backup_topic".to_string(),
        };
        let notifier = NtfyNotifier::from_config(Some(&config));
        assert!(notifier.is_configured());
    }

    #[test]
    fn mock_notifier_records_messages() {
        use mock::MockNotifier;

        let notifier = MockNotifier::new();
        notifier.notify("Backup failed", "check the logs", Priority::High);

        let sent = notifier.get_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Backup failed");
        assert_eq!(sent[0].priority, Priority::High);
    }
}
