//! Exotic-clause screening
//!
//! Every clause must be a single comparator before it is handed to
//! `node_semver`:
//! - Exact: `1.2.3`, `=1.2.3`, `v1.2.3`
//! - Partial: `1.2`, `1`
//! - Caret: `^1.2.3`, `^0.2`, `^0.0.3`
//! - Tilde: `~1.2.3`, `~1.2`, `~>1.2`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//!
//! Unions (`||`), hyphen ranges (`1.0.0 - 2.0.0`), wildcards (`*`, `1.x`)
//! and chains of several comparators in one clause are exotic.

use crate::error::RangeError;
use regex::Regex;
use std::sync::LazyLock;

static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+|[xX*])(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
    )
    .unwrap()
});

/// Operator prefixes, longest first. `~>` is yarn's spelling of `~`.
const OPERATORS: [(&str, &str); 8] = [
    (">=", ">="),
    ("<=", "<="),
    ("~>", "~"),
    (">", ">"),
    ("<", "<"),
    ("=", ""),
    ("^", "^"),
    ("~", "~"),
];

/// A clause that passed screening
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comparator {
    /// Normalised comparator text, ready for `node_semver::Range::parse`
    pub text: String,
    /// `(major, minor, patch)` of a prerelease named by the clause
    pub prerelease: Option<(u64, u64, u64)>,
}

/// Parse one comma-separated clause into a range, together with the
/// prerelease tuple it names
pub(crate) fn parse_clause(
    clause: &str,
) -> Result<(node_semver::Range, Option<(u64, u64, u64)>), RangeError> {
    let comparator = screen_clause(clause)?;
    let range = node_semver::Range::parse(&comparator.text)
        .map_err(|e| RangeError::exotic(clause.trim(), e.to_string()))?;
    Ok((range, comparator.prerelease))
}

/// Reject clauses that are not a single comparator
pub(crate) fn screen_clause(clause: &str) -> Result<Comparator, RangeError> {
    let trimmed = clause.trim();
    if trimmed.is_empty() {
        return Err(RangeError::exotic(clause, "empty clause"));
    }
    if trimmed.contains("||") {
        return Err(RangeError::exotic(trimmed, "union operator"));
    }
    if trimmed.contains(" - ") {
        return Err(RangeError::exotic(trimmed, "hyphen range"));
    }

    let comparators = comparator_tokens(trimmed);
    match comparators.as_slice() {
        [single] => screen_comparator(single).map_err(|reason| RangeError::exotic(trimmed, reason)),
        _ => Err(RangeError::exotic(trimmed, "inequality chain")),
    }
}

/// Split a clause into comparators, gluing a lone operator (`>= 1.2.3`)
/// onto the version that follows it
fn comparator_tokens(clause: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending = String::new();

    for token in clause.split_whitespace() {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '^' | '~')) {
            pending.push_str(token);
            continue;
        }
        tokens.push(format!("{}{}", pending, token));
        pending.clear();
    }
    if !pending.is_empty() {
        tokens.push(pending);
    }
    tokens
}

fn screen_comparator(token: &str) -> Result<Comparator, &'static str> {
    let (operator, rest) = OPERATORS
        .iter()
        .find_map(|(symbol, normalised)| token.strip_prefix(symbol).map(|rest| (*normalised, rest)))
        .unwrap_or(("", token));
    let rest = rest.trim();
    let version = rest.strip_prefix('v').unwrap_or(rest);

    let caps = PARTIAL_RE.captures(version).ok_or("not a version range")?;
    let mut parts = [None; 3];
    for (slot, idx) in parts.iter_mut().zip(1..=3) {
        if let Some(m) = caps.get(idx) {
            if matches!(m.as_str(), "x" | "X" | "*") {
                return Err("wildcard");
            }
            *slot = Some(m.as_str().parse::<u64>().map_err(|_| "version number too large")?);
        }
    }

    let prerelease = match (caps.get(4), parts) {
        (None, _) => None,
        (Some(_), [Some(major), Some(minor), Some(patch)]) => Some((major, minor, patch)),
        (Some(_), _) => return Err("prerelease on a partial version"),
    };

    Ok(Comparator {
        text: format!("{}{}", operator, version),
        prerelease,
    })
}
