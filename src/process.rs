//! External command execution
//!
//! This module provides:
//! - Typed outcomes for an external command (`Success`, `NonZeroExit`, `LaunchError`)
//! - A `CommandRunner` trait so the autofix workflow can be driven by a mock
//! - The system runner, which inherits the caller's stdio

use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// How an external command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status zero
    Success,
    /// Exited with a non-zero status (`None` if killed by a signal)
    NonZeroExit(Option<i32>),
    /// Could not be started at all
    LaunchError(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }

    /// Human-readable description for status lines
    pub fn describe(&self) -> String {
        match self {
            CommandOutcome::Success => "exited successfully".to_string(),
            CommandOutcome::NonZeroExit(Some(code)) => format!("exited with status {}", code),
            CommandOutcome::NonZeroExit(None) => "terminated by signal".to_string(),
            CommandOutcome::LaunchError(msg) => format!("could not be started: {}", msg),
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Trait for running external commands
pub trait CommandRunner {
    /// Run `program` with `args` in `working_dir` and wait for it to finish
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> CommandOutcome;
}

/// Runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> CommandOutcome {
        debug!("running {} in {}", command_line(program, args), working_dir.display());

        match Command::new(program).args(args).current_dir(working_dir).status() {
            Ok(status) if status.success() => CommandOutcome::Success,
            Ok(status) => CommandOutcome::NonZeroExit(status.code()),
            Err(e) => CommandOutcome::LaunchError(e.to_string()),
        }
    }
}

/// Render a command for display
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
