//! yarn-comb - find and merge duplicated packages in a yarn lockfile
//!
//! The tool reports packages that are installed in several versions,
//! recommends which duplicates can collapse onto a single version, and can
//! delete the redundant entries and reinstall.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use yarn_comb::analysis::Analysis;
use yarn_comb::autofix::{Autofix, AutofixOutcome};
use yarn_comb::cli::CliArgs;
use yarn_comb::config::Settings;
use yarn_comb::output::{create_formatter, OutputConfig};
use yarn_comb::patch::DeletionPlan;
use yarn_comb::process::SystemCommandRunner;
use yarn_comb::prompt;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    // Run the main logic and handle errors
    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the verbosity flags
fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!args.no_color)
        .with_target(false)
        .init();
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(&args)?;
    debug!(
        "yarn-comb v{}: {} ({:?} mode)",
        env!("CARGO_PKG_VERSION"),
        settings.lockfile().display(),
        settings.mode
    );

    let content = fs::read_to_string(settings.lockfile())
        .with_context(|| format!("failed to read {}", settings.lockfile().display()))?;
    let analysis = Analysis::run(&content, settings.mode);

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.no_color);
    let formatter = create_formatter(output_config);
    {
        let mut stdout = io::stdout().lock();
        formatter.format(&analysis, &mut stdout)?;
        stdout.flush()?;
    }

    if !analysis.is_fixable() {
        return Ok(ExitCode::SUCCESS);
    }
    if !settings.wants_autofix() {
        info!("autofix skipped (dry run or disabled in config)");
        return Ok(ExitCode::SUCCESS);
    }

    let plan = DeletionPlan::from_analysis(&analysis);
    let entry_count = analysis.deletion_candidates().count();
    let runner = SystemCommandRunner::new();
    let mut autofix = Autofix::new(&settings.autofix, &runner, plan);

    let outcome = autofix.run(|plan| {
        if settings.assume_yes {
            return Ok(true);
        }
        let question = format!(
            "Delete {} mergeable entries ({} lines) from {} and reinstall?",
            entry_count,
            plan.line_count(),
            settings.lockfile().display()
        );
        let mut input = io::stdin().lock();
        // Keep stdout a clean JSON document
        if args.json {
            prompt::confirm(&mut input, &mut io::stderr(), &question)
        } else {
            prompt::confirm(&mut input, &mut io::stdout(), &question)
        }
    });

    report_outcome(&outcome, &settings, args.json);
    Ok(ExitCode::from(outcome.exit_code()))
}

/// Print the terminal status line of the autofix workflow
fn report_outcome(outcome: &AutofixOutcome, settings: &Settings, json: bool) {
    let line = outcome.status_line();
    match outcome {
        AutofixOutcome::RollbackFailed { .. } => {
            error!("manual recovery required");
            eprintln!("{}", line);
            eprintln!(
                "The original lockfile is at {}",
                settings.autofix.backup_path().display()
            );
        }
        _ if json || !outcome.is_success() => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}
