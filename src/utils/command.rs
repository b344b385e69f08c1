//! External command execution with per-operation append-mode log files

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error, info};

/// Result of one external command invocation.
///
/// Boundary type: the runner never lets an error escape, callers decide
/// how to react.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failed { reason: String },
}

impl RunOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        RunOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

/// Abstraction over command execution, enabling mocking in tests
pub trait CommandRunner {
    /// Run `program` with `args` and the given environment overlay, appending
    /// combined stdout/stderr to the log file named after `log_name`.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        log_name: &str,
        env: &HashMap<String, String>,
    ) -> RunOutcome;
}

/// Runner that appends each invocation to `<log_dir>/<log_name>.log`
pub struct FileLogRunner {
    log_dir: PathBuf,
}

impl FileLogRunner {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    fn try_run(
        &self,
        program: &Path,
        args: &[String],
        log_name: &str,
        env: &HashMap<String, String>,
    ) -> Result<bool> {
        fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", self.log_dir))?;

        let log_path = self.log_dir.join(format!("{}.log", log_name));
        let mut log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {:?}", log_path))?;

        writeln!(log_file, "{}", "=".repeat(60))?;
        writeln!(
            log_file,
            "{} | {} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            program.display(),
            args.join(" ")
        )?;
        log_file.flush()?;

        debug!("Running command: {} {}", program.display(), args.join(" "));

        // Environment overlay is applied on top of the inherited environment,
        // scoped to this child only; the ambient process env is not mutated.
        let status = Command::new(program)
            .args(args)
            .envs(env)
            .stdout(Stdio::from(log_file.try_clone()?))
            .stderr(Stdio::from(log_file))
            .status()
            .with_context(|| format!("Failed to execute {}", program.display()))?;

        Ok(status.success())
    }
}

impl CommandRunner for FileLogRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        log_name: &str,
        env: &HashMap<String, String>,
    ) -> RunOutcome {
        match self.try_run(program, args, log_name, env) {
            Ok(true) => {
                info!(
                    "Operation '{}' completed, log appended to {:?}",
                    log_name,
                    self.log_dir.join(format!("{}.log", log_name))
                );
                RunOutcome::Success
            }
            Ok(false) => {
                error!(
                    "Operation '{}' failed, check {:?} for details",
                    log_name,
                    self.log_dir.join(format!("{}.log", log_name))
                );
                RunOutcome::failed(format!("{} exited with a non-zero status", program.display()))
            }
            Err(e) => {
                error!("Operation '{}' could not be executed: {:#}", log_name, e);
                RunOutcome::failed(format!("{:#}", e))
            }
        }
    }
}

/// A mock runner for tests that records calls and returns configured outcomes
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Recorded command invocation
    #[derive(Debug, Clone)]
    pub struct RunCall {
        pub program: PathBuf,
        pub args: Vec<String>,
        pub log_name: String,
        pub env: HashMap<String, String>,
    }

    /// Mock runner returning outcomes in invocation order.
    ///
    /// Once the configured outcomes are exhausted, further calls succeed.
    #[derive(Clone, Default)]
    pub struct MockRunner {
        pub calls: Arc<Mutex<Vec<RunCall>>>,
        outcomes: Arc<Mutex<Vec<RunOutcome>>>,
    }

    impl MockRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the outcome for the next unconfigured invocation
        pub fn push_outcome(self, outcome: RunOutcome) -> Self {
            self.outcomes.lock().unwrap().push(outcome);
            self
        }

        pub fn get_calls(&self) -> Vec<RunCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandRunner for MockRunner {
        fn run(
            &self,
            program: &Path,
            args: &[String],
            log_name: &str,
            env: &HashMap<String, String>,
        ) -> RunOutcome {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(RunCall {
                program: program.to_path_buf(),
                args: args.to_vec(),
                log_name: log_name.to_string(),
                env: env.clone(),
            });

            self.outcomes
                .lock()
                .unwrap()
                .get(index)
                .cloned()
                .unwrap_or(RunOutcome::Success)
        }
    }
}
