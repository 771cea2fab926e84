//! Resolved-version lines
//!
//! Handles both lockfile dialects:
//! - `  version "1.2.3"` (yarn v1)
//! - `  version: 1.2.3` (yarn berry)

use crate::error::ParseError;
use semver::Version;

const VERSION_MARKER: &str = "  version";

/// Returns true if the line declares the resolved version of the entry above
pub fn is_version_line(line: &str) -> bool {
    line.strip_prefix(VERSION_MARKER)
        .is_some_and(|rest| rest.starts_with(' ') || rest.starts_with(':'))
}

/// Extract the unquoted version value from a resolved-version line
pub fn version_value(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(VERSION_MARKER)?;
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim();
    let value = rest.trim_matches(|c| c == '"' || c == '\'');
    (!value.is_empty()).then_some(value)
}

/// Parse a resolved-version line as `major.minor.patch[-prerelease][+build]`
pub fn parse_version_line(line: &str, line_no: usize) -> Result<Version, ParseError> {
    let value = version_value(line)
        .ok_or_else(|| ParseError::malformed_version(line_no, line.trim(), "missing value"))?;
    Version::parse(value).map_err(|e| ParseError::malformed_version(line_no, value, e.to_string()))
}
