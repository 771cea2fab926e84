//! Output formatting for analysis results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - The per-group dump records both formats are built from

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::analysis::{Analysis, Summary};
use crate::domain::{
    Confidence, LineSpan, PackageGroup, Recommendation, RecommendationKind, Strictness,
};
use serde::Serialize;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Dump of duplicated groups plus the report
    #[default]
    Normal,
    /// Also dump groups with multiple versions but no duplicate major
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    ///
    /// `--quiet` only lowers the log level and never hides the dump.
    pub fn from_cli(json: bool, verbose: bool, no_color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: !no_color,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the whole analysis
    fn format(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write just the summary
    fn format_summary(&self, summary: &Summary, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

/// One entry of a dumped group
#[derive(Debug, Clone, Serialize)]
pub struct VersionRecord {
    pub descriptor: String,
    pub strictness: Strictness,
    pub version: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub line_span: LineSpan,
    pub confidence: Confidence,
}

/// Recommendations of one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRecord<'a> {
    pub category: RecommendationKind,
    pub items: Vec<&'a Recommendation>,
}

/// A package group as shown in the dump
#[derive(Debug, Clone, Serialize)]
pub struct GroupRecord<'a> {
    pub package: &'a str,
    pub versions: Vec<VersionRecord>,
    pub multiple: bool,
    pub dup_major: bool,
    pub dup_minor: bool,
    pub duplicate_majors: Vec<String>,
    pub duplicate_minors: Vec<String>,
    pub fixable: bool,
    /// Non-empty categories only, in report order
    pub recommendations: Vec<CategoryRecord<'a>>,
}

impl<'a> GroupRecord<'a> {
    /// Build the record for one group
    pub fn new(analysis: &'a Analysis, group: &'a PackageGroup) -> Self {
        let versions = analysis
            .members(group)
            .map(|entry| VersionRecord {
                descriptor: entry.descriptor.clone(),
                strictness: entry.strictness,
                version: entry.version_label(),
                major: entry.major_key().map(|k| k.to_string()),
                minor: entry.minor_key().map(|k| k.to_string()),
                line_span: entry.span,
                confidence: entry.confidence,
            })
            .collect();

        let recommendations = RecommendationKind::ALL
            .iter()
            .map(|&kind| CategoryRecord {
                category: kind,
                items: group.recommendations_of(kind).collect(),
            })
            .filter(|c| !c.items.is_empty())
            .collect();

        Self {
            package: &group.package,
            versions,
            multiple: group.has_multiple(),
            dup_major: group.has_duplicate_major(),
            dup_minor: group.has_duplicate_minor(),
            duplicate_majors: group.duplicate_majors.iter().map(ToString::to_string).collect(),
            duplicate_minors: group.duplicate_minors.iter().map(ToString::to_string).collect(),
            fixable: group.fixable,
            recommendations,
        }
    }
}

/// Groups included in the dump for a verbosity level
pub fn dump_groups(analysis: &Analysis, verbosity: Verbosity) -> Vec<GroupRecord<'_>> {
    analysis
        .groups
        .iter()
        .filter(|g| match verbosity {
            Verbosity::Normal => g.has_duplicate_major(),
            Verbosity::Verbose => g.has_multiple(),
        })
        .map(|g| GroupRecord::new(analysis, g))
        .collect()
}
