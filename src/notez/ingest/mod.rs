//! # Ingestion Pipeline
//!
//! Turns a batch of files into note content. Every file is handled on its own
//! task:
//!
//! ```text
//!   classify ─┬─ TextLike   → read locally ──────────────────────→ text
//!             └─ BinaryLike → extract ──ok──→ text + link
//!                               └─err─→ upload only ──ok──→ link
//!                                          └─err─→ notification
//! ```
//!
//! All tasks are joined before anything is merged. One file failing never
//! cancels or delays its siblings; it is reported through the
//! [`NotificationSink`] and simply contributes nothing.
//!
//! Contributions are merged in completion order, which is not input order.
//! Callers may rely on every successful contribution appearing exactly once,
//! nothing more.

use crate::classify::{classify, Classification};
use crate::error::{ExtractionError, IngestError, UploadError};
use crate::preview::PreviewDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

mod collab;
#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;

pub use collab::{Extractor, MessageSink, NotificationSink, Uploader};

const TEXT_SEPARATOR: &str = "\n\n";
const LINK_SEPARATOR: &str = "\n";
const DEFAULT_TEXT_TYPE: &str = "text/plain";

/// A file handed to the pipeline. Content is only read when needed.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    declared_type: String,
    size: u64,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

impl InputFile {
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// Describes a file on disk. The declared type is left empty, so
    /// classification falls back to the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            declared_type: String::new(),
            size: meta.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Disk(path) => tokio::fs::read(path).await,
        }
    }

    /// Full content as text; invalid UTF-8 is replaced rather than rejected.
    pub async fn text(&self) -> std::io::Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub remote_url: Option<String>,
    pub filename: String,
    pub content_type: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub remote_url: String,
    pub pathname: String,
    pub content_type: Option<String>,
}

/// The merged result of one ingestion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionOutcome {
    pub composed_text: String,
    pub composed_links: String,
    pub previews: Vec<PreviewDescriptor>,
    /// Names of files that produced nothing.
    pub failed: Vec<String>,
}

impl IngestionOutcome {
    /// Text block followed by the link block, separated by a blank line.
    pub fn merged(&self) -> String {
        match (self.composed_text.is_empty(), self.composed_links.is_empty()) {
            (false, false) => format!(
                "{}{TEXT_SEPARATOR}{}",
                self.composed_text, self.composed_links
            ),
            (false, true) => self.composed_text.clone(),
            (true, false) => self.composed_links.clone(),
            (true, true) => String::new(),
        }
    }
}

/// What one successfully processed file adds to the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub text: Option<String>,
    pub link: Option<String>,
    pub preview: PreviewDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Unreadable(String),
    Unprocessable {
        extraction: ExtractionError,
        upload: UploadError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub reason: FailureReason,
}

impl FileFailure {
    /// Short, user-facing reason.
    pub fn message(&self) -> String {
        match &self.reason {
            FailureReason::Unreadable(err) => format!("could not read file: {err}"),
            FailureReason::Unprocessable { extraction, upload } => {
                if matches!(extraction, ExtractionError::Unauthorized) {
                    extraction.to_string()
                } else if matches!(upload, UploadError::Unauthorized) {
                    upload.to_string()
                } else {
                    format!("{extraction} (upload fallback: {upload})")
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    Processed(Contribution),
    Failed(FileFailure),
}

/// Runs the pipeline against a fixed set of collaborators.
#[derive(Clone)]
pub struct Ingestor {
    extractor: Arc<dyn Extractor>,
    uploader: Arc<dyn Uploader>,
    sink: Arc<dyn NotificationSink>,
}

impl Ingestor {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        uploader: Arc<dyn Uploader>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            extractor,
            uploader,
            sink,
        }
    }

    /// Processes every file concurrently and merges what succeeded.
    ///
    /// Per-file failures go to the notification sink. The call itself only
    /// fails when a task cannot be joined, and even then only after every
    /// other task has settled.
    pub async fn ingest(&self, files: Vec<InputFile>) -> Result<IngestionOutcome, IngestError> {
        if files.is_empty() {
            return Ok(IngestionOutcome::default());
        }

        let total = files.len();
        let mut tasks = JoinSet::new();
        for file in files {
            let extractor = Arc::clone(&self.extractor);
            let uploader = Arc::clone(&self.uploader);
            tasks.spawn(process_file(file, extractor, uploader));
        }

        let mut settled = Vec::with_capacity(total);
        let mut join_failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => settled.push(result),
                Err(err) => {
                    warn!("ingestion task did not complete: {err}");
                    join_failure.get_or_insert_with(|| err.to_string());
                }
            }
        }

        if let Some(err) = join_failure {
            return Err(IngestError::Aggregate(err));
        }

        debug!(files = total, "ingestion settled");
        Ok(merge(settled, self.sink.as_ref()))
    }
}

async fn process_file(
    file: InputFile,
    extractor: Arc<dyn Extractor>,
    uploader: Arc<dyn Uploader>,
) -> FileResult {
    match classify(&file) {
        Classification::TextLike => read_text(&file).await,
        Classification::BinaryLike => {
            extract_or_upload(&file, extractor.as_ref(), uploader.as_ref()).await
        }
    }
}

async fn read_text(file: &InputFile) -> FileResult {
    debug!(file = file.name(), "reading text-like file");
    match file.text().await {
        Ok(raw) => {
            let trimmed = raw.trim();
            let content_type = if file.declared_type().is_empty() {
                DEFAULT_TEXT_TYPE
            } else {
                file.declared_type()
            };
            FileResult::Processed(Contribution {
                text: (!trimmed.is_empty()).then(|| trimmed.to_string()),
                link: None,
                preview: PreviewDescriptor::local(file.name(), content_type),
            })
        }
        Err(err) => FileResult::Failed(FileFailure {
            file_name: file.name().to_string(),
            reason: FailureReason::Unreadable(err.to_string()),
        }),
    }
}

/// Extraction first; a plain upload is the fallback. First success wins.
async fn extract_or_upload(
    file: &InputFile,
    extractor: &dyn Extractor,
    uploader: &dyn Uploader,
) -> FileResult {
    let extraction = match try_extract(file, extractor).await {
        Ok(contribution) => return FileResult::Processed(contribution),
        Err(err) => err,
    };

    warn!(
        file = file.name(),
        "extraction failed ({extraction}), falling back to upload"
    );

    match try_upload_only(file, uploader).await {
        Ok(contribution) => FileResult::Processed(contribution),
        Err(upload) => FileResult::Failed(FileFailure {
            file_name: file.name().to_string(),
            reason: FailureReason::Unprocessable { extraction, upload },
        }),
    }
}

async fn try_extract(
    file: &InputFile,
    extractor: &dyn Extractor,
) -> Result<Contribution, ExtractionError> {
    debug!(file = file.name(), "extracting");
    let extracted = extractor.extract(file).await?;
    let text = extracted.text.trim();

    Ok(Contribution {
        text: (!text.is_empty()).then(|| text.to_string()),
        link: extracted
            .remote_url
            .as_deref()
            .map(|url| markdown_link(file.name(), url)),
        preview: PreviewDescriptor::remote(file.name(), extracted.remote_url, extracted.content_type),
    })
}

async fn try_upload_only(
    file: &InputFile,
    uploader: &dyn Uploader,
) -> Result<Contribution, UploadError> {
    let uploaded = uploader.upload(file).await?;

    Ok(Contribution {
        text: None,
        link: Some(markdown_link(file.name(), &uploaded.remote_url)),
        preview: PreviewDescriptor::remote(
            file.name(),
            Some(uploaded.remote_url),
            uploaded.content_type,
        ),
    })
}

fn markdown_link(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

/// Single-threaded merge over settled results, in the order given.
fn merge(results: Vec<FileResult>, sink: &dyn NotificationSink) -> IngestionOutcome {
    let mut texts = Vec::new();
    let mut links = Vec::new();
    let mut outcome = IngestionOutcome::default();

    for result in results {
        match result {
            FileResult::Processed(contribution) => {
                texts.extend(contribution.text);
                links.extend(contribution.link);
                outcome.previews.push(contribution.preview);
            }
            FileResult::Failed(failure) => {
                sink.notify(&failure.file_name, &failure.message());
                outcome.failed.push(failure.file_name);
            }
        }
    }

    outcome.composed_text = texts.join(TEXT_SEPARATOR);
    outcome.composed_links = links.join(LINK_SEPARATOR);
    outcome
}
