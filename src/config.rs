//! Configuration file loading for yarn-comb.
//!
//! Discovers and loads `yarn-comb.toml` from the project directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use crate::analysis::AnalysisMode;
use crate::autofix::AutofixSettings;
use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::patch::PatchStrategy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "yarn-comb.toml";

/// Top-level configuration from yarn-comb.toml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombConfig {
    /// Lockfile path, relative to the project directory.
    pub lockfile: PathBuf,

    /// Recommendation pass.
    pub mode: AnalysisMode,

    /// Autofix settings.
    pub autofix: AutofixConfig,
}

impl Default for CombConfig {
    fn default() -> Self {
        Self {
            lockfile: PathBuf::from("yarn.lock"),
            mode: AnalysisMode::default(),
            autofix: AutofixConfig::default(),
        }
    }
}

/// Autofix section of the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutofixConfig {
    /// Whether the autofix workflow may run at all.
    pub enabled: bool,

    /// Skip the confirmation prompt.
    pub assume_yes: bool,

    /// How lines are deleted.
    pub strategy: PatchStrategy,

    /// Suffix for the backup copy.
    pub backup_suffix: String,

    /// Command that regenerates the lockfile.
    pub install_command: Vec<String>,
}

impl Default for AutofixConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            assume_yes: false,
            strategy: PatchStrategy::default(),
            backup_suffix: ".bak".to_string(),
            install_command: vec!["yarn".to_string(), "install".to_string()],
        }
    }
}

/// Discover the yarn-comb.toml config file.
///
/// Returns `None` if the project directory has none.
pub fn discover_config(project_dir: &Path) -> Option<PathBuf> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path.display());
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path.display());
        None
    }
}

/// Load and parse a yarn-comb.toml config file.
pub fn load_config(path: &Path) -> Result<CombConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
    parse_config(&contents).map_err(|message| ConfigError::parse_error(path, message))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> Result<CombConfig, String> {
    toml::from_str(contents).map_err(|e| e.to_string())
}

/// Load config from the project directory, or return the default if not found.
pub fn load_or_default(project_dir: &Path) -> Result<CombConfig, ConfigError> {
    match discover_config(project_dir) {
        Some(path) => load_config(&path),
        None => Ok(CombConfig::default()),
    }
}

/// Effective settings for one run.
///
/// CLI arguments take precedence over config file settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Project directory.
    pub project_dir: PathBuf,
    /// Recommendation pass.
    pub mode: AnalysisMode,
    /// Whether the autofix workflow may run.
    pub autofix_enabled: bool,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
    /// Report only.
    pub dry_run: bool,
    /// Autofix workflow settings, lockfile path included.
    pub autofix: AutofixSettings,
}

impl Settings {
    /// Merge a loaded config with CLI arguments.
    pub fn resolve(args: &CliArgs, config: CombConfig) -> Result<Self, ConfigError> {
        if args.quiet && args.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }

        let lockfile = args.lockfile.clone().unwrap_or(config.lockfile);
        let lockfile = if lockfile.is_absolute() {
            lockfile
        } else {
            args.path.join(lockfile)
        };

        let mode = if args.fallback {
            AnalysisMode::Fallback
        } else {
            config.mode
        };

        let install_command = args
            .install_command
            .clone()
            .unwrap_or(config.autofix.install_command);
        if install_command.is_empty() || install_command[0].trim().is_empty() {
            return Err(ConfigError::EmptyInstallCommand);
        }
        if config.autofix.backup_suffix.is_empty() {
            return Err(ConfigError::EmptyBackupSuffix);
        }

        Ok(Self {
            project_dir: args.path.clone(),
            mode,
            autofix_enabled: config.autofix.enabled,
            assume_yes: args.yes || config.autofix.assume_yes,
            dry_run: args.dry_run,
            autofix: AutofixSettings {
                lockfile,
                working_dir: args.path.clone(),
                strategy: args.strategy.unwrap_or(config.autofix.strategy),
                backup_suffix: config.autofix.backup_suffix,
                install_command,
            },
        })
    }

    /// Load the project's config file and merge it with CLI arguments.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let config = load_or_default(&args.path)?;
        Self::resolve(args, config)
    }

    pub fn lockfile(&self) -> &Path {
        &self.autofix.lockfile
    }

    /// Returns true if the autofix workflow should be entered for a fixable lockfile
    pub fn wants_autofix(&self) -> bool {
        self.autofix_enabled && !self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["yarn-comb", "/proj"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CombConfig::default());
        assert_eq!(config.lockfile, PathBuf::from("yarn.lock"));
        assert_eq!(config.mode, AnalysisMode::Full);
        assert!(config.autofix.enabled);
        assert_eq!(config.autofix.install_command, vec!["yarn", "install"]);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
lockfile = "web/yarn.lock"
mode = "fallback"

[autofix]
enabled = false
assume_yes = true
strategy = "sed"
backup_suffix = ".orig"
install_command = ["yarn", "install", "--offline"]
"#,
        )
        .unwrap();
        assert_eq!(config.lockfile, PathBuf::from("web/yarn.lock"));
        assert_eq!(config.mode, AnalysisMode::Fallback);
        assert!(!config.autofix.enabled);
        assert!(config.autofix.assume_yes);
        assert_eq!(config.autofix.strategy, PatchStrategy::Sed);
        assert_eq!(config.autofix.backup_suffix, ".orig");
        assert_eq!(config.autofix.install_command.len(), 3);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse_config("mod = \"full\"").unwrap_err();
        assert!(err.contains("unknown field"));
        assert!(parse_config("mode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_discover_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(discover_config(temp_dir.path()).is_none());
        assert_eq!(load_or_default(temp_dir.path()).unwrap(), CombConfig::default());

        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "mode = \"fallback\"\n").unwrap();
        assert!(discover_config(temp_dir.path()).is_some());
        assert_eq!(
            load_or_default(temp_dir.path()).unwrap().mode,
            AnalysisMode::Fallback
        );
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "lockfile = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(&args(&[]), CombConfig::default()).unwrap();
        assert_eq!(settings.lockfile(), Path::new("/proj/yarn.lock"));
        assert_eq!(settings.mode, AnalysisMode::Full);
        assert_eq!(settings.autofix.strategy, PatchStrategy::Native);
        assert_eq!(settings.autofix.working_dir, PathBuf::from("/proj"));
        assert!(!settings.assume_yes);
        assert!(settings.wants_autofix());
    }

    #[test]
    fn test_resolve_cli_overrides_config() {
        let config = CombConfig {
            lockfile: PathBuf::from("other.lock"),
            autofix: AutofixConfig {
                strategy: PatchStrategy::Sed,
                ..AutofixConfig::default()
            },
            ..CombConfig::default()
        };
        let settings = Settings::resolve(
            &args(&[
                "--lockfile",
                "/abs/yarn.lock",
                "--fallback",
                "--strategy",
                "native",
                "-y",
                "--install-command",
                "true",
            ]),
            config,
        )
        .unwrap();
        assert_eq!(settings.lockfile(), Path::new("/abs/yarn.lock"));
        assert_eq!(settings.mode, AnalysisMode::Fallback);
        assert_eq!(settings.autofix.strategy, PatchStrategy::Native);
        assert!(settings.assume_yes);
        assert_eq!(settings.autofix.install_command, vec!["true"]);
    }

    #[test]
    fn test_resolve_dry_run_and_disabled() {
        let settings = Settings::resolve(&args(&["-n"]), CombConfig::default()).unwrap();
        assert!(!settings.wants_autofix());

        let config = CombConfig {
            autofix: AutofixConfig {
                enabled: false,
                ..AutofixConfig::default()
            },
            ..CombConfig::default()
        };
        let settings = Settings::resolve(&args(&[]), config).unwrap();
        assert!(!settings.wants_autofix());
    }

    #[test]
    fn test_resolve_rejects_invalid() {
        let err = Settings::resolve(&args(&["-q", "--verbose"]), CombConfig::default());
        assert!(matches!(err, Err(ConfigError::ConflictingOptions { .. })));

        let config = CombConfig {
            autofix: AutofixConfig {
                install_command: Vec::new(),
                ..AutofixConfig::default()
            },
            ..CombConfig::default()
        };
        let err = Settings::resolve(&args(&[]), config);
        assert!(matches!(err, Err(ConfigError::EmptyInstallCommand)));

        let config = CombConfig {
            autofix: AutofixConfig {
                backup_suffix: String::new(),
                ..AutofixConfig::default()
            },
            ..CombConfig::default()
        };
        let err = Settings::resolve(&args(&[]), config);
        assert!(matches!(err, Err(ConfigError::EmptyBackupSuffix)));
    }
}
