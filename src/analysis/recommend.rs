//! Recommendation generator
//!
//! Two complete passes exist:
//! - `recommend_full` intersects descriptors into ranges and compares
//!   adjacent versions inside every duplicate-major bucket
//! - `recommend_fallback` only looks at strictness labels and treats a
//!   bucket of caret-compatible descriptors as mergeable
//!
//! Only one of them runs for a given analysis.

use super::AnalysisMode;
use crate::domain::{
    LockEntry, MajorKey, PackageGroup, Recommendation, RecommendationKind, Strictness,
};
use crate::range::{self, Range};
use std::collections::HashSet;
use tracing::debug;

/// Populate the recommendations of one group.
///
/// Groups with a single entry are left untouched.
pub fn recommend(group: &mut PackageGroup, entries: &mut [LockEntry], mode: AnalysisMode) {
    if !group.has_multiple() {
        return;
    }
    match mode {
        AnalysisMode::Full => recommend_full(group, entries),
        AnalysisMode::Fallback => recommend_fallback(group, entries),
    }
}

/// Members of the group that fall into one major bucket, in version order
fn bucket(group: &PackageGroup, entries: &[LockEntry], major: MajorKey) -> Vec<usize> {
    group
        .members
        .iter()
        .copied()
        .filter(|&idx| entries[idx].major_key() == Some(major))
        .collect()
}

/// Range analysis over adjacent pairs of each duplicate-major bucket
pub fn recommend_full(group: &mut PackageGroup, entries: &mut [LockEntry]) {
    for major in group.duplicate_majors.clone() {
        let members = bucket(group, entries, major);
        let mut flagged: HashSet<usize> = HashSet::new();

        for pair in members.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            let earlier_range = own_range(group, &entries[earlier], earlier, &mut flagged);
            let later_range = own_range(group, &entries[later], later, &mut flagged);
            let (Some(earlier_range), Some(later_range)) = (earlier_range, later_range) else {
                continue;
            };
            if entries[earlier].version == entries[later].version {
                // Already resolved to a single installed copy
                continue;
            }

            if !range::ranges_overlap(&earlier_range, &later_range) {
                debug!(
                    "{}: {} and {} do not overlap",
                    group.package, entries[earlier].descriptor, entries[later].descriptor
                );
                continue;
            }

            let recommendation =
                classify_pair(&entries[earlier], &earlier_range, &entries[later], &later_range);
            if recommendation.kind == RecommendationKind::Mergeable {
                entries[earlier].strictness = Strictness::Mergeable;
                entries[later].strictness = Strictness::Mergeable;
            }
            group.push(recommendation);
        }
    }
}

/// Intersect an entry's own descriptor and check its installed version
/// against it. Problems are reported once per entry.
fn own_range(
    group: &mut PackageGroup,
    entry: &LockEntry,
    idx: usize,
    flagged: &mut HashSet<usize>,
) -> Option<Range> {
    let version = entry.version.as_ref()?;

    match range::intersect(&entry.descriptor) {
        Err(err) => {
            if flagged.insert(idx) {
                group.push(
                    Recommendation::new(RecommendationKind::Exotic, &entry.package, err.to_string())
                        .with_offender(version.to_string(), &entry.descriptor),
                );
            }
            None
        }
        Ok(own) if !range::satisfies(version, &own) => {
            if flagged.insert(idx) {
                group.push(
                    Recommendation::new(
                        RecommendationKind::Unsatisfied,
                        &entry.package,
                        format!("installed {} is outside {}", version, own),
                    )
                    .with_offender(version.to_string(), &entry.descriptor),
                );
            }
            None
        }
        Ok(own) => Some(own),
    }
}

/// Decide what an overlapping pair can become
fn classify_pair(
    earlier: &LockEntry,
    earlier_range: &Range,
    later: &LockEntry,
    later_range: &Range,
) -> Recommendation {
    let earlier_version = earlier.version_label();
    let later_version = later.version_label();

    let later_fits_earlier = later
        .version
        .as_ref()
        .is_some_and(|v| range::satisfies(v, earlier_range));
    let earlier_fits_later = earlier
        .version
        .as_ref()
        .is_some_and(|v| range::satisfies(v, later_range));

    let (kind, rationale) = if later_fits_earlier {
        (
            RecommendationKind::Mergeable,
            format!(
                "{} satisfies {} ({}); both can resolve to {}",
                later_version, earlier.descriptor, earlier_range, later_version
            ),
        )
    } else if earlier_fits_later {
        (
            RecommendationKind::DowngradeNeeded,
            format!(
                "{} satisfies {} ({}); merging requires moving {} down to {}",
                earlier_version, later.descriptor, later_range, later.descriptor, earlier_version
            ),
        )
    } else {
        (
            RecommendationKind::Unknown,
            format!(
                "{} and {} overlap but neither installed version satisfies the other",
                earlier_range, later_range
            ),
        )
    };

    Recommendation::new(kind, &earlier.package, rationale)
        .with_offender(earlier_version, &earlier.descriptor)
        .with_offender(later_version, &later.descriptor)
}

/// Strictness-only pass used when range analysis is unavailable
pub fn recommend_fallback(group: &mut PackageGroup, entries: &mut [LockEntry]) {
    for major in group.duplicate_majors.clone() {
        let members = bucket(group, entries, major);
        let compatible: Vec<usize> = members
            .iter()
            .copied()
            .filter(|&idx| entries[idx].strictness == Strictness::Compatible)
            .collect();

        let rationale = if compatible.len() == members.len() {
            format!(
                "all {} constraints on major {} are caret-compatible (fully mergeable)",
                members.len(),
                major
            )
        } else if compatible.len() > 1 {
            format!(
                "{} of {} constraints on major {} are caret-compatible (partially mergeable)",
                compatible.len(),
                members.len(),
                major
            )
        } else {
            continue;
        };

        let mut recommendation =
            Recommendation::new(RecommendationKind::Mergeable, &group.package, rationale);
        for &idx in &compatible {
            recommendation =
                recommendation.with_offender(entries[idx].version_label(), &entries[idx].descriptor);
            entries[idx].strictness = Strictness::Mergeable;
        }
        group.push(recommendation);
    }
}
