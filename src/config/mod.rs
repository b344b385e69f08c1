//! Configuration module for restic-runner
//!
//! Handles loading the YAML configuration read once at startup. The parsed
//! [`Config`] is constructed in `main` and passed by value into the handlers;
//! there is no global configuration state.

mod loader;
mod types;

pub use loader::{load_config, ConfigError, Result};
pub use types::*;
