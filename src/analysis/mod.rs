//! Lockfile analysis
//!
//! This module provides:
//! - Grouping of entries by package and duplicate-bucket detection
//! - The recommendation generator in its two modes
//! - Summary counts for the report

mod grouper;
mod recommend;

pub use grouper::{compare_versions, group_entries};
pub use recommend::{recommend, recommend_fallback, recommend_full};

use crate::domain::{LockEntry, PackageGroup};
use crate::error::ParseError;
use crate::parser::{self, ParseReport};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which recommendation pass runs, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Range intersection over adjacent versions
    #[default]
    Full,
    /// Strictness labels only
    Fallback,
}

/// Headline counts of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Entries in the lockfile, copies included
    pub total_entries: usize,
    /// Packages with more than one entry
    pub multiple_versions: usize,
    /// Packages with a duplicated major bucket
    pub duplicate_majors: usize,
    /// Packages with a duplicated minor bucket
    pub duplicate_minors: usize,
    /// Packages with at least one safe merge
    pub fixable: usize,
    /// Parser warnings
    pub malformed_lines: usize,
}

/// Complete result of analysing one lockfile
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Entries in file order; groups refer to them by index
    pub entries: Vec<LockEntry>,
    /// Groups in order of first appearance
    pub groups: Vec<PackageGroup>,
    /// Parser warnings
    pub warnings: Vec<ParseError>,
    /// Number of lines in the analysed file
    pub total_lines: usize,
    /// Mode the recommendations were produced with
    pub mode: AnalysisMode,
}

impl Analysis {
    /// Parse and analyse lockfile content
    pub fn run(content: &str, mode: AnalysisMode) -> Self {
        Self::from_report(parser::parse_lockfile(content), mode)
    }

    /// Analyse an already parsed lockfile
    pub fn from_report(report: ParseReport, mode: AnalysisMode) -> Self {
        let ParseReport {
            mut entries,
            warnings,
            total_lines,
        } = report;

        let mut groups = group_entries(&entries);
        for group in groups.iter_mut().filter(|g| g.has_multiple()) {
            recommend(group, &mut entries, mode);
        }

        let analysis = Self {
            entries,
            groups,
            warnings,
            total_lines,
            mode,
        };
        let summary = analysis.summary();
        info!(
            "analysed {} entries: {} with multiple versions, {} fixable",
            summary.total_entries, summary.multiple_versions, summary.fixable
        );
        analysis
    }

    /// Headline counts
    pub fn summary(&self) -> Summary {
        Summary {
            total_entries: self.entries.len(),
            multiple_versions: self.groups.iter().filter(|g| g.has_multiple()).count(),
            duplicate_majors: self.groups.iter().filter(|g| g.has_duplicate_major()).count(),
            duplicate_minors: self.groups.iter().filter(|g| g.has_duplicate_minor()).count(),
            fixable: self.groups.iter().filter(|g| g.fixable).count(),
            malformed_lines: self.warnings.len(),
        }
    }

    /// Returns true if any group has a safe merge
    pub fn is_fixable(&self) -> bool {
        self.groups.iter().any(|g| g.fixable)
    }

    /// Entries the deletion step would remove, in file order
    pub fn deletion_candidates(&self) -> impl Iterator<Item = &LockEntry> {
        self.entries.iter().filter(|e| e.is_deletion_candidate())
    }

    /// Member entries of a group, in version order
    pub fn members<'a>(&'a self, group: &'a PackageGroup) -> impl Iterator<Item = &'a LockEntry> {
        group.members.iter().map(move |&idx| &self.entries[idx])
    }
}
