use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum NotezError {
    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("Unauthorized: sign in to manage your notes")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, NotezError>;

/// Failure reported by an extraction collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Please sign in to upload files.")]
    Unauthorized,

    #[error("{0}")]
    Other(String),
}

/// Failure reported by an upload collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please sign in to upload files.")]
    Unauthorized,

    #[error("{0}")]
    Other(String),
}

/// Batch-level ingestion failure. Per-file failures never end up here.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("ingestion task could not be joined: {0}")]
    Aggregate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_variants_share_the_sign_in_message() {
        assert_eq!(
            ExtractionError::Unauthorized.to_string(),
            UploadError::Unauthorized.to_string()
        );
        assert_eq!(
            UploadError::Unauthorized.to_string(),
            "Please sign in to upload files."
        );
    }

    #[test]
    fn other_variants_display_their_reason() {
        assert_eq!(
            ExtractionError::Other("boom".into()).to_string(),
            "boom"
        );
    }
}
