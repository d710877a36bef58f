//! Path validation
//!
//! Every category and file name reaching the store is untrusted. They all go
//! through [`sanitize_segment`] before touching the filesystem.

use crate::error::StorageError;

/// Reduce an untrusted path-like string to its final safe segment.
///
/// Separators (`/` and `\`), empty segments and `.`/`..` references are
/// dropped. Input containing a NUL byte yields an empty string.
pub fn sanitize_segment(raw: &str) -> String {
    if raw.contains('\0') {
        return String::new();
    }

    raw.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Sanitize a name and reject it if nothing usable is left.
pub fn validate_name(raw: &str) -> Result<String, StorageError> {
    let name = sanitize_segment(raw);
    if name.is_empty() {
        return Err(StorageError::InvalidName(raw.to_string()));
    }
    Ok(name)
}

/// Lowercased text after the last dot of a file name. A bare `.svg` has
/// extension `svg`.
pub fn extension_of(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}
