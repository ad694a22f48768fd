//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum number of records (lines) accepted from a single input file
pub const MAX_RECORDS: usize = 10_000_000;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_record_limit(records.len()).is_some() {
///     return Err(...);
/// }
/// records.push(new_record); // Safe to add
/// ```
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Output file prefix with a trailing `_`, or empty if none was given.
///
/// # Examples
///
/// ```
/// use graphbin::utils::validation::normalize_prefix;
///
/// assert_eq!(normalize_prefix(Some("sample")), "sample_");
/// assert_eq!(normalize_prefix(Some("sample_")), "sample_");
/// assert_eq!(normalize_prefix(None), "");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: Option<&str>) -> String {
    match prefix.map(str::trim) {
        None | Some("") => String::new(),
        Some(p) if p.ends_with('_') => p.to_string(),
        Some(p) => format!("{p}_"),
    }
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid prefix '{0}': must not contain path separators")]
    InvalidPrefix(String),
    #[error("Output path '{0}' exists and is not a directory")]
    NotADirectory(String),
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDirectory {
        path: String,
        source: std::io::Error,
    },
}

/// Reject prefixes that would place output files outside the output directory
///
/// # Errors
///
/// Returns `ValidationError::InvalidPrefix` if the prefix contains `/`, `\`,
/// `..` or a NUL byte.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.contains('/') || prefix.contains('\\') || prefix.contains("..") || prefix.contains('\0')
    {
        return Err(ValidationError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Create the output directory if it does not exist yet
///
/// # Errors
///
/// Returns `ValidationError::NotADirectory` if the path exists as a file, or
/// `ValidationError::CreateDirectory` if it cannot be created.
pub fn ensure_output_dir(path: &Path) -> Result<(), ValidationError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(ValidationError::NotADirectory(path.display().to_string()));
    }
    std::fs::create_dir_all(path).map_err(|source| ValidationError::CreateDirectory {
        path: path.display().to_string(),
        source,
    })
}
