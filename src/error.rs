//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: lockfile lines the parser could not interpret (recoverable)
//! - RangeError: constraint clauses outside ordinary range algebra
//! - AutofixError: failures while patching, reinstalling or rolling back
//! - ConfigError: configuration file and CLI option problems

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Lockfile parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Range algebra errors
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Autofix workflow errors
    #[error(transparent)]
    Autofix(#[from] AutofixError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while scanning a lockfile.
///
/// None of these abort a scan: the parser records them as warnings and
/// carries on with the next line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A top-level line without a recoverable `name@range` shape
    #[error("malformed entry at line {line}: {content}")]
    MalformedEntry { line: usize, content: String },

    /// A resolved-version line that is not a semantic version
    #[error("malformed version '{value}' at line {line}: {message}")]
    MalformedVersion {
        line: usize,
        value: String,
        message: String,
    },

    /// A resolved-version line with no entry above it
    #[error("version line {line} does not belong to any entry")]
    OrphanVersion { line: usize },
}

/// Errors produced by the range intersection engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The clause uses operators that interval arithmetic cannot combine
    #[error("exotic range '{clause}': {reason}")]
    Exotic { clause: String, reason: String },
}

/// Errors raised by the autofix workflow
#[derive(Error, Debug)]
pub enum AutofixError {
    /// The line deletion step failed; nothing was reinstalled
    #[error("failed to patch {path}: {message}")]
    PatchFailure { path: PathBuf, message: String },

    /// The reinstall step failed; the lockfile was restored from backup
    #[error("reinstall command `{command}` failed: {message}")]
    ReinstallFailure { command: String, message: String },

    /// Restoring the backup failed; manual recovery is required
    #[error("failed to restore {path} from backup {backup}: {source}")]
    RollbackFailure {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// The install command is empty
    #[error("install command must not be empty")]
    EmptyInstallCommand,

    /// The backup suffix is empty
    #[error("backup suffix must not be empty")]
    EmptyBackupSuffix,

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ParseError {
    /// Creates a new MalformedEntry error
    pub fn malformed_entry(line: usize, content: impl Into<String>) -> Self {
        ParseError::MalformedEntry {
            line,
            content: content.into(),
        }
    }

    /// Creates a new MalformedVersion error
    pub fn malformed_version(
        line: usize,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ParseError::MalformedVersion {
            line,
            value: value.into(),
            message: message.into(),
        }
    }

    /// Line number the error refers to
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedEntry { line, .. }
            | ParseError::MalformedVersion { line, .. }
            | ParseError::OrphanVersion { line } => *line,
        }
    }
}

impl RangeError {
    /// Creates a new Exotic error
    pub fn exotic(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        RangeError::Exotic {
            clause: clause.into(),
            reason: reason.into(),
        }
    }
}

impl AutofixError {
    /// Creates a new PatchFailure error
    pub fn patch_failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AutofixError::PatchFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new ReinstallFailure error
    pub fn reinstall_failure(command: impl Into<String>, message: impl Into<String>) -> Self {
        AutofixError::ReinstallFailure {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}
