use crate::error::StorageError;

/// Checks if a path string contains path traversal patterns.
pub fn contains_path_traversal(path: &str) -> bool {
    path == ".."
        || path.starts_with("../")
        || path.contains("/../")
        || path.ends_with("/..")
        || path.starts_with("..\\")
        || path.contains("\\..\\")
        || path.ends_with("\\..")
}

/// Sanitizes an uploaded file name down to a flat display name.
///
/// Browsers may submit a full client-side path; only the final segment is
/// kept. Parent-directory segments anywhere in the submitted name reject
/// the upload outright rather than being silently normalized away.
pub fn sanitize_original_name(name: &str) -> Result<String, StorageError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(StorageError::InvalidFileName(
            "file name cannot be empty".into(),
        ));
    }

    if trimmed.contains('\0') {
        return Err(StorageError::InvalidFileName(format!(
            "{trimmed:?} contains null bytes"
        )));
    }

    // Reject ASCII control characters to prevent
    // header injection when the name is echoed back on download.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidFileName(format!(
            "{trimmed:?} contains control characters"
        )));
    }

    if contains_path_traversal(trimmed) {
        return Err(StorageError::InvalidFileName(format!(
            "{trimmed} contains a parent-directory segment"
        )));
    }

    let flat = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
        .trim();

    if flat.is_empty() {
        return Err(StorageError::InvalidFileName(format!(
            "{trimmed} has no file name component"
        )));
    }

    Ok(flat.to_string())
}

/// Extension of a file name including the leading dot, or an empty string
/// when the name has no extension. A lone leading dot counts as a hidden
/// file, not an extension.
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    }
}
