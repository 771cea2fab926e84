//! Autofix workflow
//!
//! The workflow is a small state machine entered only when at least one
//! group is fixable:
//!
//! ```text
//! Idle -> Confirming -> Patching -> Reinstalling -> Done
//!             |             |             |
//!          Declined    PatchFailed    RolledBack / RollbackFailed
//! ```
//!
//! Every terminal state is an `AutofixOutcome` with its own status line.

use crate::error::AutofixError;
use crate::patch::{self, DeletionPlan, PatchStrategy};
use crate::process::{command_line, CommandRunner};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Everything the workflow needs to know about the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutofixSettings {
    /// Lockfile to patch
    pub lockfile: PathBuf,
    /// Directory the install command runs in
    pub working_dir: PathBuf,
    /// How lines are deleted
    pub strategy: PatchStrategy,
    /// Suffix appended to the lockfile path for the backup copy
    pub backup_suffix: String,
    /// Program and arguments that regenerate the lockfile
    pub install_command: Vec<String>,
}

impl AutofixSettings {
    /// Path of the backup copy
    pub fn backup_path(&self) -> PathBuf {
        patch::backup_path(&self.lockfile, &self.backup_suffix)
    }
}

/// Non-terminal workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Confirming,
    Patching,
    Reinstalling,
}

/// Terminal workflow states
#[derive(Debug)]
pub enum AutofixOutcome {
    /// The plan was empty
    NothingToFix,
    /// The user answered no; the lockfile is untouched
    Declined,
    /// Patched and reinstalled; the backup was removed
    Done,
    /// Deletion failed; nothing was reinstalled
    PatchFailed(AutofixError),
    /// Reinstall failed and the lockfile was restored from backup
    RolledBack(AutofixError),
    /// Reinstall failed and the backup could not be restored
    RollbackFailed {
        cause: AutofixError,
        error: AutofixError,
    },
}

impl AutofixOutcome {
    /// One-line summary printed at the end of a run
    pub fn status_line(&self) -> String {
        match self {
            AutofixOutcome::NothingToFix => "Nothing to fix.".to_string(),
            AutofixOutcome::Declined => "Aborted, lockfile left untouched.".to_string(),
            AutofixOutcome::Done => "Patched lockfile and reinstalled successfully.".to_string(),
            AutofixOutcome::PatchFailed(e) => format!("Patch failed: {}", e),
            AutofixOutcome::RolledBack(e) => {
                format!("Reinstall failed, lockfile restored from backup: {}", e)
            }
            AutofixOutcome::RollbackFailed { cause, error } => format!(
                "Reinstall failed ({}) and rollback failed: {}. Restore the backup manually.",
                cause, error
            ),
        }
    }

    /// Process exit code for the outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            AutofixOutcome::NothingToFix | AutofixOutcome::Declined | AutofixOutcome::Done => 0,
            AutofixOutcome::PatchFailed(_) | AutofixOutcome::RolledBack(_) => 1,
            AutofixOutcome::RollbackFailed { .. } => 2,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

/// One run of the workflow. Not resumable.
pub struct Autofix<'a, R: CommandRunner + ?Sized> {
    settings: &'a AutofixSettings,
    runner: &'a R,
    plan: DeletionPlan,
    visited: Vec<Stage>,
}

impl<'a, R: CommandRunner + ?Sized> Autofix<'a, R> {
    pub fn new(settings: &'a AutofixSettings, runner: &'a R, plan: DeletionPlan) -> Self {
        Self {
            settings,
            runner,
            plan,
            visited: Vec::new(),
        }
    }

    /// Stages entered so far, in order
    pub fn visited(&self) -> &[Stage] {
        &self.visited
    }

    pub fn plan(&self) -> &DeletionPlan {
        &self.plan
    }

    /// Drive the workflow to a terminal state.
    ///
    /// `confirm` is called once, in `Confirming`, with the plan about to be
    /// applied.
    pub fn run(
        &mut self,
        confirm: impl FnOnce(&DeletionPlan) -> io::Result<bool>,
    ) -> AutofixOutcome {
        let mut confirm = Some(confirm);
        let mut stage = Stage::Idle;
        let mut backup: Option<PathBuf> = None;

        loop {
            self.visited.push(stage);
            stage = match stage {
                Stage::Idle if self.plan.is_empty() => return AutofixOutcome::NothingToFix,
                Stage::Idle => Stage::Confirming,
                Stage::Confirming => {
                    let answer = match confirm.take() {
                        Some(ask) => ask(&self.plan),
                        None => Ok(false),
                    };
                    match answer {
                        Ok(true) => Stage::Patching,
                        Ok(false) => return AutofixOutcome::Declined,
                        Err(e) => {
                            warn!("could not read confirmation: {}", e);
                            return AutofixOutcome::Declined;
                        }
                    }
                }
                Stage::Patching => match self.patch() {
                    Ok(path) => {
                        backup = Some(path);
                        Stage::Reinstalling
                    }
                    Err(e) => return AutofixOutcome::PatchFailed(e),
                },
                Stage::Reinstalling => {
                    let backup = backup.take().unwrap_or_else(|| self.settings.backup_path());
                    return match self.reinstall() {
                        Ok(()) => {
                            self.discard_backup(&backup);
                            AutofixOutcome::Done
                        }
                        Err(cause) => match self.rollback(&backup) {
                            Ok(()) => AutofixOutcome::RolledBack(cause),
                            Err(error) => {
                                error!("{}", error);
                                AutofixOutcome::RollbackFailed { cause, error }
                            }
                        },
                    };
                }
            };
        }
    }

    /// Delete the planned lines, leaving a backup behind
    fn patch(&self) -> Result<PathBuf, AutofixError> {
        let settings = self.settings;
        info!(
            "deleting {} lines in {} spans from {}",
            self.plan.line_count(),
            self.plan.spans().len(),
            settings.lockfile.display()
        );

        match settings.strategy {
            PatchStrategy::Native => {
                patch::apply_native(&self.plan, &settings.lockfile, &settings.backup_suffix)
            }
            PatchStrategy::Sed => {
                let args = self.plan.sed_args(&settings.lockfile, &settings.backup_suffix);
                let outcome = self.runner.run("sed", &args, &settings.working_dir);
                if outcome.is_success() {
                    Ok(settings.backup_path())
                } else {
                    Err(AutofixError::patch_failure(
                        &settings.lockfile,
                        format!("`{}` {}", command_line("sed", &args), outcome),
                    ))
                }
            }
        }
    }

    /// Run the install command
    fn reinstall(&self) -> Result<(), AutofixError> {
        let Some((program, args)) = self.settings.install_command.split_first() else {
            return Err(AutofixError::reinstall_failure("", "install command is empty"));
        };
        info!("running {}", command_line(program, args));

        let outcome = self.runner.run(program, args, &self.settings.working_dir);
        if outcome.is_success() {
            Ok(())
        } else {
            Err(AutofixError::reinstall_failure(
                command_line(program, args),
                outcome.describe(),
            ))
        }
    }

    /// Put the backup back over the lockfile
    fn rollback(&self, backup: &Path) -> Result<(), AutofixError> {
        warn!("restoring {} from {}", self.settings.lockfile.display(), backup.display());
        fs::rename(backup, &self.settings.lockfile).map_err(|source| {
            AutofixError::RollbackFailure {
                path: self.settings.lockfile.clone(),
                backup: backup.to_path_buf(),
                source,
            }
        })
    }

    fn discard_backup(&self, backup: &Path) {
        if let Err(e) = fs::remove_file(backup) {
            warn!("could not remove backup {}: {}", backup.display(), e);
        }
    }
}
