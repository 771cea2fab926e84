//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the summary and the group dump
//! - Parser warnings as line-numbered messages

use crate::analysis::{Analysis, AnalysisMode, Summary};
use crate::output::{dump_groups, GroupRecord, OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects which groups are dumped
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Recommendation pass used
    mode: AnalysisMode,
    /// Summary statistics
    summary: Summary,
    /// Dumped groups
    groups: Vec<GroupRecord<'a>>,
    /// Parser warnings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<JsonWarning>,
}

/// JSON representation of a parser warning
#[derive(Serialize)]
struct JsonWarning {
    line: usize,
    message: String,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            mode: analysis.mode,
            summary: analysis.summary(),
            groups: dump_groups(analysis, self.verbosity),
            warnings: analysis
                .warnings
                .iter()
                .map(|w| JsonWarning {
                    line: w.line(),
                    message: w.to_string(),
                })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    fn format_summary(&self, summary: &Summary, writer: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, summary)?;
        writeln!(writer)
    }
}
