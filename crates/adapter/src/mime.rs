//! MIME type detection from file extensions.

/// Guess a MIME type from the path's extension alone.
///
/// Never inspects content or consults the remote store; unknown extensions
/// fall back to `application/octet-stream`.
pub fn mime_for_path(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
