//! Content-type inference for inline uploads.
//!
//! Given a filename, derive a MIME type from its extension. An unresolvable
//! extension yields `None`, which is a non-fatal outcome: the attachment is
//! sent without a content type and the remote service decides at
//! transmission time. The return value is the whole contract; the core never
//! logs from this path.

/// Best-effort MIME type from a filename's extension.
pub fn infer_content_type(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first()
        .map(|m| m.essence_str().to_string())
}
