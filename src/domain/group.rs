//! Package groups derived from lockfile entries

use super::{MajorKey, MinorKey, Recommendation, RecommendationKind};

/// All entries sharing one package name
///
/// Entries are referenced by index into the owning entry list and are kept
/// in ascending resolved-version order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageGroup {
    /// Package name
    pub package: String,
    /// Indices of member entries, sorted by resolved version
    pub members: Vec<usize>,
    /// Major buckets that occur more than once
    pub duplicate_majors: Vec<MajorKey>,
    /// Minor buckets that occur more than once
    pub duplicate_minors: Vec<MinorKey>,
    /// True if at least one merge was judged safe
    pub fixable: bool,
    /// Recommendations in discovery order
    pub recommendations: Vec<Recommendation>,
}

impl PackageGroup {
    /// Creates an empty group
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            members: Vec::new(),
            duplicate_majors: Vec::new(),
            duplicate_minors: Vec::new(),
            fixable: false,
            recommendations: Vec::new(),
        }
    }

    /// More than one entry for the package
    pub fn has_multiple(&self) -> bool {
        self.members.len() > 1
    }

    /// At least one major bucket is duplicated
    pub fn has_duplicate_major(&self) -> bool {
        !self.duplicate_majors.is_empty()
    }

    /// At least one minor bucket is duplicated
    pub fn has_duplicate_minor(&self) -> bool {
        !self.duplicate_minors.is_empty()
    }

    /// Recommendations of a single category
    pub fn recommendations_of(
        &self,
        kind: RecommendationKind,
    ) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(move |r| r.kind == kind)
    }

    /// Appends a recommendation, updating `fixable`
    pub fn push(&mut self, recommendation: Recommendation) {
        if recommendation.kind == RecommendationKind::Mergeable {
            self.fixable = true;
        }
        self.recommendations.push(recommendation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_is_empty() {
        let group = PackageGroup::new("left-pad");
        assert!(!group.has_multiple());
        assert!(!group.has_duplicate_major());
        assert!(!group.fixable);
    }

    #[test]
    fn test_push_mergeable_marks_fixable() {
        let mut group = PackageGroup::new("left-pad");
        group.push(Recommendation::new(RecommendationKind::Unknown, "left-pad", "manual"));
        assert!(!group.fixable);
        group.push(Recommendation::new(RecommendationKind::Mergeable, "left-pad", "merge"));
        assert!(group.fixable);
        assert_eq!(group.recommendations_of(RecommendationKind::Mergeable).count(), 1);
        assert_eq!(group.recommendations.len(), 2);
    }
}
