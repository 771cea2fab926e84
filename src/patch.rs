//! Lockfile patching
//!
//! This module provides:
//! - `DeletionPlan`, the sorted and coalesced set of line spans to delete
//! - Single-pass application of a plan against original line numbers
//! - Rendering of the same plan as one `sed` invocation
//! - Backup handling for the native strategy

use crate::analysis::Analysis;
use crate::domain::LineSpan;
use crate::error::AutofixError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How the deletion is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PatchStrategy {
    /// Rewrite the file in process
    #[default]
    Native,
    /// Run `sed -i` with one expression per span
    Sed,
}

/// Line spans to delete, sorted and non-overlapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    spans: Vec<LineSpan>,
}

impl DeletionPlan {
    /// Build a plan; spans are sorted and touching spans merged
    pub fn new(spans: impl IntoIterator<Item = LineSpan>) -> Self {
        let mut sorted: Vec<LineSpan> = spans.into_iter().collect();
        sorted.sort();

        let mut merged: Vec<LineSpan> = Vec::with_capacity(sorted.len());
        for span in sorted {
            match merged.last_mut() {
                Some(last) if span.start <= last.end + 1 => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// Plan covering every deletion candidate of an analysis
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self::new(analysis.deletion_candidates().map(|e| e.span))
    }

    pub fn spans(&self) -> &[LineSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total number of lines the plan removes
    pub fn line_count(&self) -> usize {
        self.spans.iter().map(LineSpan::len).sum()
    }

    /// Returns true if the plan deletes `line` (1-based)
    pub fn deletes(&self, line: usize) -> bool {
        let idx = self.spans.partition_point(|s| s.end < line);
        self.spans.get(idx).is_some_and(|s| s.contains(line))
    }

    /// Remove every planned line from `content` in one pass.
    ///
    /// Line numbers refer to `content` as given, so the result does not
    /// depend on the order the spans were collected in. Line terminators of
    /// kept lines are preserved as they are.
    pub fn apply_to(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut spans = self.spans.iter().peekable();

        for (idx, line) in content.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;
            while spans.peek().is_some_and(|s| s.end < line_no) {
                spans.next();
            }
            if spans.peek().is_some_and(|s| s.contains(line_no)) {
                continue;
            }
            out.push_str(line);
        }
        out
    }

    /// One `a,bd` expression per span
    pub fn sed_expressions(&self) -> Vec<String> {
        self.spans
            .iter()
            .map(|s| format!("{},{}d", s.start, s.end))
            .collect()
    }

    /// Arguments for a single in-place `sed` run.
    ///
    /// sed addresses refer to input line numbers, so all expressions in one
    /// invocation see the original numbering.
    pub fn sed_args(&self, lockfile: &Path, backup_suffix: &str) -> Vec<String> {
        let mut args = vec![format!("-i{}", backup_suffix)];
        for expression in self.sed_expressions() {
            args.push("-e".to_string());
            args.push(expression);
        }
        args.push(lockfile.display().to_string());
        args
    }
}

/// Location of the backup copy for a lockfile
pub fn backup_path(lockfile: &Path, suffix: &str) -> PathBuf {
    let mut name = lockfile.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Back up `lockfile` and rewrite it without the planned lines.
///
/// Returns the backup path.
pub fn apply_native(
    plan: &DeletionPlan,
    lockfile: &Path,
    backup_suffix: &str,
) -> Result<PathBuf, AutofixError> {
    let content = fs::read_to_string(lockfile)
        .map_err(|e| AutofixError::patch_failure(lockfile, format!("read failed: {}", e)))?;
    let patched = plan.apply_to(&content);

    let backup = backup_path(lockfile, backup_suffix);
    fs::copy(lockfile, &backup)
        .map_err(|e| AutofixError::patch_failure(lockfile, format!("backup failed: {}", e)))?;
    fs::write(lockfile, patched)
        .map_err(|e| AutofixError::patch_failure(lockfile, format!("write failed: {}", e)))?;

    debug!(
        "deleted {} lines from {} (backup {})",
        plan.line_count(),
        lockfile.display(),
        backup.display()
    );
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plan(spans: &[(usize, usize)]) -> DeletionPlan {
        DeletionPlan::new(spans.iter().map(|&(a, b)| LineSpan::new(a, b)))
    }

    #[test]
    fn test_new_sorts_and_coalesces() {
        let p = plan(&[(9, 10), (1, 2), (3, 4), (12, 13), (13, 15)]);
        assert_eq!(
            p.spans(),
            &[LineSpan::new(1, 4), LineSpan::new(9, 10), LineSpan::new(12, 15)]
        );
        assert_eq!(p.line_count(), 10);
    }

    #[test]
    fn test_apply_to_multiple_spans() {
        let content = "1\n2\n3\n4\n5\n6\n7\n";
        let p = plan(&[(5, 6), (2, 3)]);
        assert_eq!(p.apply_to(content), "1\n4\n7\n");
    }

    #[test]
    fn test_apply_to_last_line_without_newline() {
        let content = "a\nb\nc";
        assert_eq!(plan(&[(3, 3)]).apply_to(content), "a\nb\n");
        assert_eq!(plan(&[(1, 1)]).apply_to(content), "b\nc");
    }

    #[test]
    fn test_apply_to_keeps_crlf() {
        let content = "a\r\nb\r\nc\r\n";
        assert_eq!(plan(&[(2, 2)]).apply_to(content), "a\r\nc\r\n");
    }

    #[test]
    fn test_empty_plan_is_identity() {
        let content = "a\nb\n";
        let p = DeletionPlan::default();
        assert!(p.is_empty());
        assert_eq!(p.apply_to(content), content);
    }

    #[test]
    fn test_deletes() {
        let p = plan(&[(2, 3), (7, 7)]);
        assert!(!p.deletes(1));
        assert!(p.deletes(2));
        assert!(p.deletes(3));
        assert!(!p.deletes(4));
        assert!(p.deletes(7));
        assert!(!p.deletes(8));
    }

    #[test]
    fn test_sed_args() {
        let p = plan(&[(8, 11), (4, 7)]);
        assert_eq!(p.sed_expressions(), vec!["4,11d"]);

        let p = plan(&[(12, 14), (4, 7)]);
        let args = p.sed_args(Path::new("yarn.lock"), ".bak");
        assert_eq!(args, vec!["-i.bak", "-e", "4,7d", "-e", "12,14d", "yarn.lock"]);
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/p/yarn.lock"), ".bak"),
            PathBuf::from("/p/yarn.lock.bak")
        );
    }

    #[test]
    fn test_apply_native_writes_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lockfile = temp_dir.path().join("yarn.lock");
        fs::write(&lockfile, "a\nb\nc\n").unwrap();

        let backup = apply_native(&plan(&[(2, 2)]), &lockfile, ".bak").unwrap();
        assert_eq!(fs::read_to_string(&lockfile).unwrap(), "a\nc\n");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_apply_native_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lockfile = temp_dir.path().join("yarn.lock");
        let err = apply_native(&plan(&[(1, 1)]), &lockfile, ".bak").unwrap_err();
        assert!(matches!(err, AutofixError::PatchFailure { .. }));
        assert!(!backup_path(&lockfile, ".bak").exists());
    }

    proptest! {
        #[test]
        fn test_apply_to_matches_line_filter(
            lines in 1usize..40,
            raw in prop::collection::vec((1usize..40, 0usize..4), 0..6),
        ) {
            let content: String = (1..=lines).map(|n| format!("line {}\n", n)).collect();
            let p = DeletionPlan::new(raw.iter().map(|&(start, len)| LineSpan::new(start, start + len)));

            let expected: String = (1..=lines)
                .filter(|n| !p.deletes(*n))
                .map(|n| format!("line {}\n", n))
                .collect();
            prop_assert_eq!(p.apply_to(&content), expected);
        }

        #[test]
        fn test_plan_spans_disjoint_and_sorted(
            raw in prop::collection::vec((1usize..100, 0usize..10), 0..10),
        ) {
            let p = DeletionPlan::new(raw.iter().map(|&(start, len)| LineSpan::new(start, start + len)));
            for pair in p.spans().windows(2) {
                prop_assert!(pair[0].end + 1 < pair[1].start);
            }
        }
    }
}
