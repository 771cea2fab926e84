//! Strictness classification of constraint descriptors
//!
//! Rules are evaluated in a fixed order and the first match wins. Several
//! patterns overlap, and caret/tilde change meaning once the major version
//! is zero, so the zero-major rules must run before the generic ones.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// How tightly a descriptor pins a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strictness {
    /// Pins exactly one version
    Exact,
    /// Allows patch-level drift
    Approximate,
    /// Allows minor-level drift within a major
    Compatible,
    /// Cannot be reasoned about safely (unions, inequalities, wildcards)
    #[serde(rename = "unknown")]
    Unknown,
    /// Unrecognized shape, treated as exact
    #[serde(rename = "Exact?")]
    ExactUnverified,
    /// Flagged by the recommendation generator as safe to collapse
    #[serde(rename = "mergeable")]
    Mergeable,
}

static EXACT_TRIPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+").unwrap());
static EXACT_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+").unwrap());
static UNKNOWN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[|<*\-x]").unwrap());

type Rule = (fn(&str) -> bool, Strictness);

const RULES: [Rule; 9] = [
    (|d: &str| EXACT_TRIPLE_RE.is_match(d), Strictness::Exact),
    (|d: &str| EXACT_PAIR_RE.is_match(d), Strictness::Approximate),
    (|d: &str| UNKNOWN_RE.is_match(d), Strictness::Unknown),
    (|d: &str| d.contains("^0.0."), Strictness::Exact),
    (|d: &str| d.contains("~0."), Strictness::Exact),
    (|d: &str| d.contains("^0."), Strictness::Approximate),
    (|d: &str| d.contains(">="), Strictness::Compatible),
    (|d: &str| d.contains('^'), Strictness::Compatible),
    (|d: &str| d.contains('~'), Strictness::Approximate),
];

impl Strictness {
    /// Classify a package-name-stripped descriptor
    pub fn classify(descriptor: &str) -> Self {
        RULES
            .iter()
            .find(|(matches, _)| matches(descriptor))
            .map(|(_, label)| *label)
            .unwrap_or(Strictness::ExactUnverified)
    }

    /// Label as shown in reports
    pub fn label(&self) -> &'static str {
        match self {
            Strictness::Exact => "Exact",
            Strictness::Approximate => "Approximate",
            Strictness::Compatible => "Compatible",
            Strictness::Unknown => "unknown",
            Strictness::ExactUnverified => "Exact?",
            Strictness::Mergeable => "mergeable",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_triple() {
        assert_eq!(Strictness::classify("1.2.3"), Strictness::Exact);
        assert_eq!(Strictness::classify("1.2.3, ^1.2.0"), Strictness::Exact);
    }

    #[test]
    fn test_exact_pair() {
        assert_eq!(Strictness::classify("1.2"), Strictness::Approximate);
    }

    #[test]
    fn test_unknown_operators() {
        assert_eq!(Strictness::classify(">=1.0.0 <2.0.0"), Strictness::Unknown);
        assert_eq!(Strictness::classify("^1.0.0 || ^2.0.0"), Strictness::Unknown);
        assert_eq!(Strictness::classify("*"), Strictness::Unknown);
        assert_eq!(Strictness::classify("1.0.0 - 2.0.0"), Strictness::Exact);
        assert_eq!(Strictness::classify("~1.0.0-beta.1"), Strictness::Unknown);
        assert_eq!(Strictness::classify("^1.x"), Strictness::Unknown);
    }

    #[test]
    fn test_zero_major_rules_win_over_generic_caret() {
        assert_eq!(Strictness::classify("^0.1.2"), Strictness::Approximate);
        assert_eq!(Strictness::classify("^0.0.3"), Strictness::Exact);
        assert_eq!(Strictness::classify("~0.4.1"), Strictness::Exact);
    }

    #[test]
    fn test_generic_operators() {
        assert_eq!(Strictness::classify(">=1.0.0"), Strictness::Compatible);
        assert_eq!(Strictness::classify("^1.2.0"), Strictness::Compatible);
        assert_eq!(Strictness::classify("^1.2.0, ^1.3.0"), Strictness::Compatible);
        assert_eq!(Strictness::classify("~1.2.0"), Strictness::Approximate);
    }

    #[test]
    fn test_fallthrough_is_exact_unverified() {
        assert_eq!(Strictness::classify("latest"), Strictness::ExactUnverified);
        assert_eq!(Strictness::classify(""), Strictness::ExactUnverified);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Strictness::Unknown.label(), "unknown");
        assert_eq!(Strictness::ExactUnverified.to_string(), "Exact?");
        assert_eq!(Strictness::Mergeable.to_string(), "mergeable");
    }
}
