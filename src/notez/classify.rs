//! # File Classification
//!
//! Decides whether an incoming file can be read directly as text or has to go
//! through the extraction service first.
//!
//! The declared content type wins when present. Browsers and some upload
//! sources leave it empty, in which case the lowercased file name's extension
//! is the only signal left.

use crate::ingest::InputFile;

const TEXT_CONTENT_TYPES: &[&str] = &["application/json", "text/csv", "text/markdown", "text/x-log"];
const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".csv", ".json", ".log"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Content is used as-is.
    TextLike,
    /// Content needs extraction before it is usable as text.
    BinaryLike,
}

pub fn classify(file: &InputFile) -> Classification {
    classify_parts(file.name(), file.declared_type())
}

/// Classification over the raw name and declared type.
pub fn classify_parts(name: &str, declared_type: &str) -> Classification {
    let text_like = if declared_type.is_empty() {
        let name = name.to_lowercase();
        TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    } else {
        declared_type.starts_with("text/") || TEXT_CONTENT_TYPES.contains(&declared_type)
    };

    if text_like {
        Classification::TextLike
    } else {
        Classification::BinaryLike
    }
}
