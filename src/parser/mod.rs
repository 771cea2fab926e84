//! Lockfile parser
//!
//! Parsing runs in two phases:
//! - `scan` walks the file once and records declaration lines and
//!   resolved-version lines independently, with their line numbers
//! - `merge` builds entries from the declarations, fixes every line span
//!   from the position of the next declaration, and zips each version line
//!   onto the nearest declaration above it
//!
//! Neither phase keeps a "current entry" pointer, so the result depends
//! only on line numbers. A berry `__metadata:` block still bounds the spans
//! around it and owns its own `version:` line, but yields no entry.

mod entry;
mod version;

pub use entry::{
    is_declaration, is_metadata, package_name, parse_entry_line, strip_package, ParsedEntry,
};
pub use version::{is_version_line, parse_version_line, version_value};

use crate::domain::{LineSpan, LockEntry};
use crate::error::ParseError;
use tracing::{debug, warn};

/// A raw line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    /// 1-based line number
    pub line: usize,
    /// Line text without its terminator
    pub text: String,
}

/// Output of the scanning phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Top-level declaration lines in file order
    pub declarations: Vec<NumberedLine>,
    /// Resolved-version lines in file order
    pub versions: Vec<NumberedLine>,
    /// Number of lines in the file
    pub total_lines: usize,
}

/// Result of parsing a lockfile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Entries in file order
    pub entries: Vec<LockEntry>,
    /// Recoverable problems found while parsing
    pub warnings: Vec<ParseError>,
    /// Number of lines in the file
    pub total_lines: usize,
}

impl ParseReport {
    /// Number of warnings about malformed entries
    pub fn malformed_entries(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ParseError::MalformedEntry { .. }))
            .count()
    }

    /// Number of warnings about version lines that are not semantic versions
    pub fn malformed_versions(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ParseError::MalformedVersion { .. }))
            .count()
    }
}

/// Phase one: classify every line of the file
pub fn scan(content: &str) -> Scan {
    let mut scan = Scan::default();

    for (idx, text) in content.lines().enumerate() {
        let line = idx + 1;
        scan.total_lines = line;

        if is_declaration(text) {
            scan.declarations.push(NumberedLine {
                line,
                text: text.to_string(),
            });
        } else if is_version_line(text) {
            scan.versions.push(NumberedLine {
                line,
                text: text.to_string(),
            });
        }
    }

    scan
}

/// Phase two: build entries and attach versions
pub fn merge(scan: Scan) -> ParseReport {
    let mut report = ParseReport {
        total_lines: scan.total_lines,
        ..ParseReport::default()
    };

    let starts: Vec<usize> = scan.declarations.iter().map(|d| d.line).collect();
    // Entry index for each declaration, `None` for the metadata block
    let mut owners: Vec<Option<usize>> = Vec::with_capacity(starts.len());

    for (idx, declaration) in scan.declarations.iter().enumerate() {
        if is_metadata(&declaration.text) {
            owners.push(None);
            continue;
        }

        let end = starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(scan.total_lines);
        let span = LineSpan::new(declaration.line, end);

        let entry = match parse_entry_line(&declaration.text, declaration.line) {
            Ok(parsed) => LockEntry::new(parsed.package, parsed.descriptor, span),
            Err(err) => {
                warn!("{}", err);
                report.warnings.push(err);
                LockEntry::malformed(declaration.text.trim_end(), span)
            }
        };
        owners.push(Some(report.entries.len()));
        report.entries.push(entry);
    }

    for version_line in &scan.versions {
        // Index of the last declaration that starts above this line
        let owner = starts.partition_point(|&start| start < version_line.line);
        let Some(idx) = owner.checked_sub(1) else {
            let err = ParseError::OrphanVersion {
                line: version_line.line,
            };
            warn!("{}", err);
            report.warnings.push(err);
            continue;
        };

        let Some(entry_idx) = owners[idx] else {
            debug!("skipping metadata version line {}", version_line.line);
            continue;
        };
        let entry = &mut report.entries[entry_idx];
        if entry.version.is_some() {
            debug!(
                "ignoring extra version line {} for {}",
                version_line.line, entry.package
            );
            continue;
        }

        match parse_version_line(&version_line.text, version_line.line) {
            Ok(version) => entry.version = Some(version),
            Err(err) => {
                warn!("{}", err);
                report.warnings.push(err);
            }
        }
    }

    debug!(
        "parsed {} entries from {} lines ({} warnings)",
        report.entries.len(),
        report.total_lines,
        report.warnings.len()
    );
    report
}

/// Parse a whole lockfile
pub fn parse_lockfile(content: &str) -> ParseReport {
    merge(scan(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Confidence, Strictness};

    const LOCKFILE: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/core@^7.0.0", "@babel/core@^7.1.0":
  version "7.1.2"
  resolved "https://registry.yarnpkg.com/@babel/core/-/core-7.1.2.tgz"
  dependencies:
    left-pad "^1.0.0"

left-pad@^1.0.0:
  version "1.0.1"
  resolved "https://registry.yarnpkg.com/left-pad/-/left-pad-1.0.1.tgz"

left-pad@^1.1.0:
  version "1.1.3"
"#;

    #[test]
    fn test_scan_classifies_lines() {
        let scan = scan(LOCKFILE);
        assert_eq!(scan.total_lines, 16);
        let decl_lines: Vec<usize> = scan.declarations.iter().map(|d| d.line).collect();
        assert_eq!(decl_lines, vec![5, 11, 15]);
        let version_lines: Vec<usize> = scan.versions.iter().map(|v| v.line).collect();
        assert_eq!(version_lines, vec![6, 12, 16]);
    }

    #[test]
    fn test_parse_entries_and_versions() {
        let report = parse_lockfile(LOCKFILE);
        assert!(report.warnings.is_empty());
        assert_eq!(report.entries.len(), 3);

        let babel = &report.entries[0];
        assert_eq!(babel.package, "@babel/core");
        assert_eq!(babel.descriptor, "^7.0.0, ^7.1.0");
        assert_eq!(babel.strictness, Strictness::Compatible);
        assert_eq!(babel.version_label(), "7.1.2");

        assert_eq!(report.entries[1].version_label(), "1.0.1");
        assert_eq!(report.entries[2].version_label(), "1.1.3");
    }

    #[test]
    fn test_spans_are_contiguous_to_end_of_file() {
        let report = parse_lockfile(LOCKFILE);
        let spans: Vec<LineSpan> = report.entries.iter().map(|e| e.span).collect();
        assert_eq!(
            spans,
            vec![LineSpan::new(5, 10), LineSpan::new(11, 14), LineSpan::new(15, 16)]
        );
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
        }
    }

    #[test]
    fn test_malformed_entry_is_recorded_with_low_confidence() {
        let content = "garbage:\n  version \"x\"\n\nleft-pad@^1.0.0:\n  version \"1.0.1\"\n";
        let report = parse_lockfile(content);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].confidence, Confidence::Low);
        assert!(report.entries[0].version.is_none());
        assert_eq!(report.malformed_entries(), 1);
        assert_eq!(report.malformed_versions(), 1);
        assert_eq!(report.entries[1].version_label(), "1.0.1");
    }

    #[test]
    fn test_berry_lockfile() {
        let content = r#"# This file is generated by running "yarn install" inside your project.

__metadata:
  version: 6
  cacheKey: 8

"left-pad@npm:^1.0.0":
  version: 1.0.1
  resolution: "left-pad@npm:1.0.1"

"left-pad@npm:^1.1.0, left-pad@npm:~1.1.0":
  version: 1.1.3
  resolution: "left-pad@npm:1.1.3"
"#;
        let report = parse_lockfile(content);
        assert!(report.warnings.is_empty());
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].descriptor, "^1.0.0");
        assert_eq!(report.entries[0].version_label(), "1.0.1");
        assert_eq!(report.entries[0].span, LineSpan::new(7, 10));
        assert_eq!(report.entries[1].descriptor, "^1.1.0, ~1.1.0");
        assert_eq!(report.entries[1].version_label(), "1.1.3");
    }

    #[test]
    fn test_malformed_version_leaves_entry_unversioned() {
        let content = "left-pad@^1.0.0:\n  version \"banana\"\n";
        let report = parse_lockfile(content);
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].version.is_none());
        assert!(matches!(
            report.warnings[0],
            ParseError::MalformedVersion { line: 2, .. }
        ));
    }

    #[test]
    fn test_orphan_version_line() {
        let content = "  version \"1.0.0\"\nleft-pad@^1.0.0:\n  version \"1.0.1\"\n";
        let report = parse_lockfile(content);
        assert_eq!(report.warnings, vec![ParseError::OrphanVersion { line: 1 }]);
        assert_eq!(report.malformed_versions(), 0);
        assert_eq!(report.malformed_entries(), 0);
        assert_eq!(report.entries[0].version_label(), "1.0.1");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "left-pad@^1.0.0:\r\n  version \"1.0.1\"\r\n";
        let report = parse_lockfile(content);
        assert_eq!(report.entries[0].descriptor, "^1.0.0");
        assert_eq!(report.entries[0].version_label(), "1.0.1");
        assert_eq!(report.entries[0].span, LineSpan::new(1, 2));
    }

    #[test]
    fn test_empty_file() {
        let report = parse_lockfile("");
        assert!(report.entries.is_empty());
        assert_eq!(report.total_lines, 0);
    }
}
