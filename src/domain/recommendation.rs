//! Recommendation records emitted by the analysis

use serde::Serialize;
use std::fmt;

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    /// Descriptor uses operators the range engine cannot combine
    Exotic,
    /// Installed version does not satisfy its own descriptor
    Unsatisfied,
    /// Merge possible only by moving the later dependent down
    DowngradeNeeded,
    /// Both entries can collapse onto one installed version
    Mergeable,
    /// Ranges overlap but neither version satisfies the other
    Unknown,
}

impl RecommendationKind {
    /// All categories in report order
    pub const ALL: [RecommendationKind; 5] = [
        RecommendationKind::Exotic,
        RecommendationKind::Unsatisfied,
        RecommendationKind::DowngradeNeeded,
        RecommendationKind::Mergeable,
        RecommendationKind::Unknown,
    ];

    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationKind::Exotic => "exotic",
            RecommendationKind::Unsatisfied => "unsatisfied",
            RecommendationKind::DowngradeNeeded => "downgrade-needed",
            RecommendationKind::Mergeable => "mergeable",
            RecommendationKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recommendation about one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Category
    pub kind: RecommendationKind,
    /// Package the recommendation is about
    pub package: String,
    /// Offending resolved versions
    pub versions: Vec<String>,
    /// Offending descriptors, parallel to `versions`
    pub descriptors: Vec<String>,
    /// Free-text explanation
    pub rationale: String,
}

impl Recommendation {
    /// Creates a new recommendation without offenders
    pub fn new(
        kind: RecommendationKind,
        package: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            package: package.into(),
            versions: Vec::new(),
            descriptors: Vec::new(),
            rationale: rationale.into(),
        }
    }

    /// Adds an offending `(version, descriptor)` pair
    pub fn with_offender(mut self, version: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.versions.push(version.into());
        self.descriptors.push(descriptor.into());
        self
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offenders: Vec<String> = self
            .versions
            .iter()
            .zip(&self.descriptors)
            .map(|(version, descriptor)| format!("{} ({})", version, descriptor))
            .collect();
        write!(
            f,
            "[{}] {}: {} - {}",
            self.kind,
            self.package,
            offenders.join(", "),
            self.rationale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(RecommendationKind::DowngradeNeeded.label(), "downgrade-needed");
        assert_eq!(RecommendationKind::Mergeable.to_string(), "mergeable");
        assert_eq!(RecommendationKind::ALL.len(), 5);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&RecommendationKind::DowngradeNeeded).unwrap();
        assert_eq!(json, "\"downgrade-needed\"");
    }

    #[test]
    fn test_display() {
        let rec = Recommendation::new(RecommendationKind::Mergeable, "left-pad", "1.1.3 satisfies ^1.0.0")
            .with_offender("1.0.1", "^1.0.0")
            .with_offender("1.1.3", "^1.1.0");
        let text = rec.to_string();
        assert!(text.starts_with("[mergeable] left-pad:"));
        assert!(text.contains("1.0.1 (^1.0.0), 1.1.3 (^1.1.0)"));
    }
}
