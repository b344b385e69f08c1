pub mod command;
pub mod restic;
pub mod ssm;
pub mod update;

// Re-export commonly used types and traits
pub use command::{CommandRunner, FileLogRunner, RunOutcome};
pub use ssm::{SecretProvider, SsmSecretProvider};
