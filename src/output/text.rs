//! Text output formatter for human-readable display
//!
//! This module provides:
//! - A dump of every duplicated group with its version records
//! - Recommendations listed by category, colored by severity
//! - The summary report in the classic aligned layout

use crate::analysis::{Analysis, Summary};
use crate::domain::{RecommendationKind, Strictness};
use crate::output::{dump_groups, GroupRecord, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Width of the report labels, up to the colon
const LABEL_WIDTH: usize = 33;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint_kind(&self, kind: RecommendationKind) -> String {
        let label = kind.label();
        if !self.color {
            return label.to_string();
        }
        match kind {
            RecommendationKind::Mergeable => label.green().bold().to_string(),
            RecommendationKind::DowngradeNeeded => label.yellow().to_string(),
            RecommendationKind::Unsatisfied => label.red().bold().to_string(),
            RecommendationKind::Exotic => label.magenta().to_string(),
            RecommendationKind::Unknown => label.dimmed().to_string(),
        }
    }

    fn paint_strictness(&self, strictness: Strictness, width: usize) -> String {
        let label = format!("{:width$}", strictness.label(), width = width);
        if self.color && strictness == Strictness::Mergeable {
            label.green().to_string()
        } else {
            label
        }
    }

    fn paint_package(&self, name: &str) -> String {
        if self.color {
            name.bright_white().bold().to_string()
        } else {
            name.to_string()
        }
    }

    /// Format one dumped group
    fn format_group(&self, record: &GroupRecord<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let marker = if record.fixable { "  [fixable]" } else { "" };
        writeln!(writer, "{}{}", self.paint_package(record.package), marker)?;

        let descriptor_width = record
            .versions
            .iter()
            .map(|v| v.descriptor.len())
            .max()
            .unwrap_or(0);
        let version_width = record
            .versions
            .iter()
            .map(|v| v.version.len())
            .max()
            .unwrap_or(0);

        for version in &record.versions {
            writeln!(
                writer,
                "  {:dw$}  {:vw$}  {}  major {}  minor {}  lines {}",
                version.descriptor,
                version.version,
                self.paint_strictness(version.strictness, 10),
                version.major.as_deref().unwrap_or("?"),
                version.minor.as_deref().unwrap_or("?"),
                version.line_span,
                dw = descriptor_width,
                vw = version_width,
            )?;
        }

        writeln!(
            writer,
            "  multiple: {}, dup_major: {}, dup_minor: {}",
            record.multiple,
            flag(record.dup_major, &record.duplicate_majors),
            flag(record.dup_minor, &record.duplicate_minors),
        )?;

        for category in &record.recommendations {
            writeln!(writer, "  {}:", self.paint_kind(category.category))?;
            for item in &category.items {
                let offenders: Vec<String> = item
                    .versions
                    .iter()
                    .zip(&item.descriptors)
                    .map(|(v, d)| format!("{} ({})", v, d))
                    .collect();
                writeln!(writer, "    - {}: {}", offenders.join(", "), item.rationale)?;
            }
        }
        Ok(())
    }
}

/// `true (1, 2)` or `false`
fn flag(set: bool, keys: &[String]) -> String {
    if set {
        format!("true ({})", keys.join(", "))
    } else {
        "false".to_string()
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let groups = dump_groups(analysis, self.verbosity);
        for record in &groups {
            self.format_group(record, writer)?;
            writeln!(writer)?;
        }

        self.format_summary(&analysis.summary(), writer)
    }

    fn format_summary(&self, summary: &Summary, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "yarn.lock report --------------------------")?;
        writeln!(
            writer,
            "{:>w$}: {}",
            "Total packages (including copies)",
            summary.total_entries,
            w = LABEL_WIDTH
        )?;
        writeln!(
            writer,
            "{:>w$}: {}",
            "packages with multiple versions",
            summary.multiple_versions,
            w = LABEL_WIDTH
        )?;
        writeln!(
            writer,
            "{:>w$}: {}",
            "duplicate major versions",
            summary.duplicate_majors,
            w = LABEL_WIDTH
        )?;

        if summary.duplicate_minors > 0 {
            writeln!(
                writer,
                "{:>w$}: {}",
                "duplicate minor versions",
                summary.duplicate_minors,
                w = LABEL_WIDTH
            )?;
        }
        if summary.malformed_lines > 0 {
            writeln!(
                writer,
                "{:>w$}: {}",
                "malformed lines",
                summary.malformed_lines,
                w = LABEL_WIDTH
            )?;
        }
        if summary.fixable > 0 {
            writeln!(
                writer,
                "{:>w$}: {}",
                "fixable packages",
                summary.fixable,
                w = LABEL_WIDTH
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisMode;

    const LEFT_PAD: &str = "left-pad@^1.0.0:\n  version \"1.0.1\"\n\nleft-pad@^1.1.0:\n  version \"1.1.3\"\n\nleft-pad@~1.1.0:\n  version \"1.1.3\"\n";

    fn render(content: &str, verbosity: Verbosity) -> String {
        let analysis = Analysis::run(content, AnalysisMode::Full);
        let formatter = TextFormatter::with_color(verbosity, false);
        let mut out = Vec::new();
        formatter.format(&analysis, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_lines() {
        let output = render(LEFT_PAD, Verbosity::Normal);
        assert!(output.contains("yarn.lock report --------------------------\n"));
        assert!(output.contains("Total packages (including copies): 3\n"));
        assert!(output.contains("\n  packages with multiple versions: 1\n"));
        assert!(output.contains("\n         duplicate major versions: 1\n"));
        assert!(output.contains("\n         duplicate minor versions: 1\n"));
        assert!(!output.contains("malformed lines"));
    }

    #[test]
    fn test_dump_precedes_report() {
        let output = render(LEFT_PAD, Verbosity::Normal);
        let dump = output.find("left-pad  [fixable]").unwrap();
        let report = output.find("yarn.lock report").unwrap();
        assert!(dump < report);
    }

    #[test]
    fn test_dump_lists_versions_and_recommendations() {
        let output = render(LEFT_PAD, Verbosity::Normal);
        assert!(output.contains("^1.0.0  1.0.1  mergeable   major 1  minor 1.0  lines 1-3"));
        assert!(output.contains("~1.1.0  1.1.3  Approximate  major 1  minor 1.1  lines 7-8"));
        assert!(output.contains("multiple: true, dup_major: true (1), dup_minor: true (1.1)"));
        assert!(output.contains("  mergeable:\n    - 1.0.1 (^1.0.0), 1.1.3 (^1.1.0): "));
    }

    #[test]
    fn test_malformed_lines_reported() {
        let output = render("garbage:\n  version \"6\"\n", Verbosity::Normal);
        assert!(output.contains("\n                  malformed lines: 2\n"));
    }

    #[test]
    fn test_no_duplicates() {
        let output = render("a@^1.0.0:\n  version \"1.0.0\"\n", Verbosity::Normal);
        assert!(output.starts_with("yarn.lock report"));
        assert!(output.contains("packages with multiple versions: 0"));
        assert!(output.contains("duplicate major versions: 0"));
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let analysis = Analysis::run(LEFT_PAD, AnalysisMode::Full);
        let formatter = TextFormatter::new(Verbosity::Normal);
        let mut out = Vec::new();
        formatter.format(&analysis, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("left-pad"));
        assert!(output.contains("Total packages (including copies): 3"));
    }
}
