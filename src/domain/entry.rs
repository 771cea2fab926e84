//! Lockfile entry types
//!
//! A `LockEntry` is one top-level declaration of a yarn lockfile: a package,
//! the constraint descriptors that resolve to it, the resolved version and
//! the exact lines it occupies in the source file.

use super::Strictness;
use semver::Version;
use serde::Serialize;
use std::fmt;

/// Inclusive, 1-indexed range of lines occupied by an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineSpan {
    /// First line of the entry
    pub start: usize,
    /// Last line of the entry (inclusive)
    pub end: usize,
}

impl LineSpan {
    /// Creates a new span. `end` is clamped so the span is never inverted.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of lines covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A span always covers at least one line
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `line` falls inside the span
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// How much the parser trusts an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Parsed as `name@range`
    High,
    /// The line did not have a package/constraint shape
    Low,
}

/// Compatibility bucket used for duplicate-major detection.
///
/// Semantic versioning treats every `0.y` line as its own compatibility
/// range, so a zero major is bucketed together with its minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorKey {
    major: u64,
    zero_minor: Option<u64>,
}

impl MajorKey {
    /// Bucket for a resolved version
    pub fn of(version: &Version) -> Self {
        Self {
            major: version.major,
            zero_minor: (version.major == 0).then_some(version.minor),
        }
    }
}

impl fmt::Display for MajorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zero_minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

/// Bucket used for duplicate-minor detection, one level below `MajorKey`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinorKey {
    major: MajorKey,
    next: u64,
}

impl MinorKey {
    /// Bucket for a resolved version
    pub fn of(version: &Version) -> Self {
        let next = if version.major == 0 {
            version.patch
        } else {
            version.minor
        };
        Self {
            major: MajorKey::of(version),
            next,
        }
    }

    /// The enclosing major bucket
    pub fn major(&self) -> MajorKey {
        self.major
    }
}

impl fmt::Display for MinorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.next)
    }
}

/// One `(package, constraint)` record of the lockfile
#[derive(Debug, Clone, PartialEq)]
pub struct LockEntry {
    /// Package name, including its `@scope/` prefix if any
    pub package: String,
    /// Comma-joined range clauses with the package name stripped
    pub descriptor: String,
    /// How tightly the descriptor pins a version
    pub strictness: Strictness,
    /// Resolved version, absent if the lockfile is malformed
    pub version: Option<Version>,
    /// Lines this entry occupies in the source file
    pub span: LineSpan,
    /// Parser confidence
    pub confidence: Confidence,
}

impl LockEntry {
    /// Creates a well-formed entry; the strictness is derived from the descriptor
    pub fn new(package: impl Into<String>, descriptor: impl Into<String>, span: LineSpan) -> Self {
        let descriptor = descriptor.into();
        Self {
            package: package.into(),
            strictness: Strictness::classify(&descriptor),
            descriptor,
            version: None,
            span,
            confidence: Confidence::High,
        }
    }

    /// Creates a low-confidence entry for a line the parser could not interpret
    pub fn malformed(raw: impl Into<String>, span: LineSpan) -> Self {
        Self {
            package: raw.into(),
            descriptor: String::new(),
            strictness: Strictness::Unknown,
            version: None,
            span,
            confidence: Confidence::Low,
        }
    }

    /// Attaches a resolved version
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Major bucket of the resolved version
    pub fn major_key(&self) -> Option<MajorKey> {
        self.version.as_ref().map(MajorKey::of)
    }

    /// Minor bucket of the resolved version
    pub fn minor_key(&self) -> Option<MinorKey> {
        self.version.as_ref().map(MinorKey::of)
    }

    /// Returns true if the deletion step should remove this entry
    pub fn is_deletion_candidate(&self) -> bool {
        self.strictness == Strictness::Mergeable
    }

    /// Resolved version rendered for display
    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "?".to_string())
    }
}
