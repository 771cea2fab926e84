//! Entry parser for top-level lockfile declarations
//!
//! Handles declaration lines such as:
//! - `left-pad@^1.0.0:`
//! - `"left-pad@^1.0.0", "left-pad@~1.1.0":`
//! - `"@babel/core@^7.0.0", "@babel/core@^7.1.0":`
//! - `"left-pad@npm:^1.0.0, left-pad@npm:^1.1.0":` (yarn berry)
//!
//! The berry `__metadata:` block is recognised but is not an entry.

use crate::error::ParseError;
use regex::Regex;

/// Package name and descriptor recovered from a declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Package name, scope included
    pub package: String,
    /// Range clauses with the package name and quoting removed
    pub descriptor: String,
}

/// Returns true for lines that declare a new entry (not blank, not a
/// comment, not indented)
pub fn is_declaration(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(' ') && !line.starts_with('\t') && !line.starts_with('#')
}

/// Returns true for the berry `__metadata:` block header
pub fn is_metadata(line: &str) -> bool {
    line.trim_end() == "__metadata:"
}

/// Extract the package name from a declaration line.
///
/// Scoped names keep their first `@` (`@scope/name@range` gives
/// `@scope/name`); everything else is cut at the first `@`.
pub fn package_name(line: &str) -> Option<String> {
    let line = line.strip_prefix('"').unwrap_or(line);

    let name = match line.strip_prefix('@') {
        Some(rest) => {
            let (scoped, _) = rest.split_once('@')?;
            format!("@{}", scoped)
        }
        None => line.split_once('@')?.0.to_string(),
    };

    if name.is_empty() || name == "@" {
        return None;
    }
    Some(name)
}

/// Remove every `name@` occurrence and all double quotes from a line,
/// leaving the comma-joined list of range clauses.
///
/// The berry `npm:` protocol is dropped from plain ranges. Aliases such as
/// `npm:string-width@^4.2.0` name another package and are kept whole.
pub fn strip_package(line: &str, package: &str) -> String {
    let pattern = format!("\"|{}@", regex::escape(package));
    let stripped = match Regex::new(&pattern) {
        Ok(re) => re.replace_all(line, "").into_owned(),
        Err(_) => line.replace('"', ""),
    };

    stripped
        .split(',')
        .map(|clause| {
            let clause = clause.trim();
            match clause.strip_prefix("npm:") {
                Some(range) if !range.contains('@') => range,
                _ => clause,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a declaration line into package and descriptor
pub fn parse_entry_line(line: &str, line_no: usize) -> Result<ParsedEntry, ParseError> {
    let clean = line.trim_end().strip_suffix(':').unwrap_or(line.trim_end());
    let package =
        package_name(clean).ok_or_else(|| ParseError::malformed_entry(line_no, line.trim_end()))?;
    let descriptor = strip_package(clean, &package);

    Ok(ParsedEntry {
        package,
        descriptor,
    })
}
