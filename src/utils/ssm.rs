//! AWS Systems Manager Parameter Store secret provider

use anyhow::{Context, Result};
use tracing::{debug, error};

/// Read-only access to named secrets.
///
/// Absence covers every provider error (network, permission, missing
/// parameter); callers must treat `None` as "cannot proceed".
pub trait SecretProvider {
    fn get_secret(&self, name: &str) -> Option<String>;
}

/// Provider backed by SSM `GetParameter` with decryption enabled.
///
/// Requires ambient AWS credentials (instance profile, env, or shared config);
/// those are not managed here.
#[derive(Debug, Clone, Default)]
pub struct SsmSecretProvider;

impl SsmSecretProvider {
    pub fn new() -> Self {
        Self
    }

    fn fetch(&self, name: &str) -> Result<String> {
        // The SDK is async; the rest of the program is not. One throwaway
        // current-thread runtime per lookup keeps the boundary synchronous.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build runtime for SSM call")?;

        runtime.block_on(async {
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_ssm::Client::new(&aws_config);

            let response = client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await
                .with_context(|| format!("GetParameter failed for '{}'", name))?;

            response
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_string)
                .with_context(|| format!("Parameter '{}' has no value", name))
        })
    }
}

impl SecretProvider for SsmSecretProvider {
    fn get_secret(&self, name: &str) -> Option<String> {
        match self.fetch(name) {
            Ok(value) => {
                debug!("Fetched parameter '{}'", name);
                Some(value)
            }
            Err(e) => {
                error!("Failed to fetch parameter '{}': {:#}", name, e);
                None
            }
        }
    }
}

/// A mock provider for tests with a fixed set of known secrets
pub mod mock {
    use super::SecretProvider;
    use std::collections::HashMap;

    #[derive(Debug, Clone, Default)]
    pub struct MockSecretProvider {
        secrets: HashMap<String, String>,
    }

    impl MockSecretProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_secret(mut self, name: &str, value: &str) -> Self {
            self.secrets.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl SecretProvider for MockSecretProvider {
        fn get_secret(&self, name: &str) -> Option<String> {
            self.secrets.get(name).cloned()
        }
    }
}
