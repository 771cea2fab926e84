//! Range intersection engine
//!
//! A descriptor such as `^1.2.0, ~1.3.0` is a conjunction of clauses. Each
//! clause is screened for exotic syntax, parsed with `node_semver` and the
//! results are intersected:
//!
//! ```text
//! ^1.2.0          >=1.2.0 <2.0.0-0
//! ~1.3.0          >=1.3.0 <1.4.0-0
//! intersection    >=1.3.0 <1.4.0-0
//! ```
//!
//! A range is empty when it holds no release version and no prerelease a
//! clause asked for, so `>1.2.3, <1.2.4` is empty.

mod clause;

use crate::error::RangeError;
use semver::Version;
use std::fmt;

/// The versions allowed by a whole descriptor
#[derive(Debug, Clone)]
pub struct Range {
    /// `None` once an intersection turned out disjoint
    inner: Option<node_semver::Range>,
    /// `(major, minor, patch)` tuples whose prereleases may match
    prerelease_tuples: Vec<(u64, u64, u64)>,
}

impl Range {
    /// Versions contained in both ranges
    pub fn intersect(&self, other: &Range) -> Range {
        let inner = match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => a.intersect(b),
            _ => None,
        };

        let mut prerelease_tuples = self.prerelease_tuples.clone();
        for tuple in &other.prerelease_tuples {
            if !prerelease_tuples.contains(tuple) {
                prerelease_tuples.push(*tuple);
            }
        }

        Range {
            inner,
            prerelease_tuples,
        }
    }

    /// Returns true if `version` lies inside the range.
    ///
    /// Build metadata is ignored. A prerelease only matches when one of the
    /// clauses named a prerelease of the same `major.minor.patch`.
    pub fn satisfied_by(&self, version: &Version) -> bool {
        let Some(inner) = &self.inner else {
            return false;
        };
        if !version.pre.is_empty()
            && !self
                .prerelease_tuples
                .contains(&(version.major, version.minor, version.patch))
        {
            return false;
        }
        to_node(version).is_some_and(|v| inner.satisfies(&v))
    }

    /// Lowest version the range accepts, if any
    pub fn witness(&self) -> Option<Version> {
        let inner = self.inner.as_ref()?;
        let min = Version::parse(&inner.min_version()?.to_string()).ok()?;
        let release = Version::new(min.major, min.minor, min.patch);
        let next_patch = Version::new(min.major, min.minor, min.patch + 1);

        [min, release, next_patch]
            .into_iter()
            .find(|candidate| self.satisfied_by(candidate))
    }

    /// Returns true if no version can satisfy the range
    pub fn is_empty(&self) -> bool {
        self.witness().is_none()
    }

    /// Returns true if at least one version lies in both ranges
    pub fn overlaps(&self, other: &Range) -> bool {
        !self.intersect(other).is_empty()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) if !self.is_empty() => write!(f, "{}", inner),
            _ => f.write_str("<0.0.0-0"),
        }
    }
}

/// `node_semver` view of a resolved version, build metadata dropped
fn to_node(version: &Version) -> Option<node_semver::Version> {
    let text = if version.pre.is_empty() {
        format!("{}.{}.{}", version.major, version.minor, version.patch)
    } else {
        format!(
            "{}.{}.{}-{}",
            version.major, version.minor, version.patch, version.pre
        )
    };
    node_semver::Version::parse(&text).ok()
}

/// Intersect every comma-separated clause of a descriptor into one range
pub fn intersect(descriptor: &str) -> Result<Range, RangeError> {
    if descriptor.trim().is_empty() {
        return Err(RangeError::exotic(descriptor, "empty descriptor"));
    }

    let mut acc: Option<Range> = None;
    for text in descriptor.split(',') {
        let (inner, prerelease) = clause::parse_clause(text)?;
        let range = Range {
            inner: Some(inner),
            prerelease_tuples: prerelease.into_iter().collect(),
        };
        acc = Some(match acc {
            Some(prev) => prev.intersect(&range),
            None => range,
        });
    }
    acc.ok_or_else(|| RangeError::exotic(descriptor, "empty descriptor"))
}

/// Returns true if `version` lies inside `range`
pub fn satisfies(version: &Version, range: &Range) -> bool {
    range.satisfied_by(version)
}

/// Returns true if at least one version lies in both ranges
pub fn ranges_overlap(a: &Range, b: &Range) -> bool {
    a.overlaps(b)
}
