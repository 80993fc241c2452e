//! INCLUDE target resolution.
//!
//! Reads the file name record that follows an INCLUDE keyword, substitutes
//! `$NAME` path variables from the PATHS table and resolves relative paths
//! against the including file's directory.

use crate::constants::PATH_VARIABLE_SIGIL;
use crate::error::{Result, ScheduleError};
use crate::models::PathTable;
use crate::records::path_record_body;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name from an INCLUDE record, quotes and trailing `/` comment removed
pub fn read_include_target(line: &str) -> String {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let target = match chars.next() {
        Some(quote @ ('\'' | '"')) => {
            let rest = chars.as_str();
            match rest.find(quote) {
                Some(end) => &rest[..end],
                None => rest,
            }
        }
        _ => path_record_body(trimmed).split_whitespace().next().unwrap_or(""),
    };
    target.replace('\\', "/")
}

/// Replace each `$NAME` segment (up to the next `/`) with its PATHS value
pub fn substitute_path_variables(target: &str, paths: &PathTable, source: &Path) -> Result<String> {
    let mut resolved = String::with_capacity(target.len());
    let mut rest = target;

    while let Some(start) = rest.find(PATH_VARIABLE_SIGIL) {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('/').unwrap_or(after.len());
        let variable = &after[..end];

        let value = paths
            .get(variable)
            .ok_or_else(|| ScheduleError::UndefinedPathVariable {
                variable: variable.to_string(),
                path: source.to_path_buf(),
            })?;
        resolved.push_str(value);
        rest = &after[end..];
    }
    resolved.push_str(rest);

    Ok(resolved)
}

/// Full path of an include target relative to the including file
pub fn resolve_include(
    line: &str,
    paths: &PathTable,
    including_file: &Path,
) -> Result<PathBuf> {
    let target = read_include_target(line);
    let substituted = substitute_path_variables(&target, paths, including_file)?;
    let candidate = PathBuf::from(&substituted);

    let resolved = if candidate.is_absolute() {
        candidate
    } else {
        including_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(candidate)
    };

    debug!(
        "Resolved INCLUDE '{}' from {} to {}",
        target,
        including_file.display(),
        resolved.display()
    );
    Ok(resolved)
}
