//! # Blob Uploads
//!
//! [`UploadPolicy`] decides what may be stored: files over the size limit or
//! outside the allow-list are rejected before any bytes are written.
//! [`DirectoryUploader`] is the uploader used by the CLI. It stores blobs in a
//! per-owner directory and reports a URL built from a configurable base.
//!
//! ```text
//! <root>/
//! └── <owner>/
//!     └── <stem>-<suffix>.<ext>
//! ```

use crate::error::UploadError;
use crate::ingest::{InputFile, UploadResult, Uploader};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const SUFFIX_LEN: usize = 12;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    // word
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    // excel
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
    // powerpoint
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // text
    "text/plain",
    "text/markdown",
    "application/json",
    "text/x-log",
];

fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    let ct = match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" | "rtf" => "text/plain",
        "md" => "text/markdown",
        "json" => "application/json",
        "log" => "text/x-log",
        _ => return None,
    };
    Some(ct)
}

/// Declared type if there is one, otherwise a guess from the extension.
pub fn guess_content_type(name: &str, declared_type: &str) -> String {
    if !declared_type.is_empty() {
        return declared_type.to_string();
    }
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    content_type_for_extension(&ext)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Validates size and type; returns the content type to store under.
    pub fn check(&self, file: &InputFile) -> Result<String, UploadError> {
        if file.size() > self.max_bytes {
            return Err(UploadError::Other(format!(
                "File size should be less than {}MB",
                self.max_bytes / (1024 * 1024)
            )));
        }

        let content_type = guess_content_type(file.name(), file.declared_type());
        if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::Other(
                "Unsupported file type. Allowed: images, PDF, Word, Excel, PowerPoint, text."
                    .to_string(),
            ));
        }
        Ok(content_type)
    }
}

pub struct DirectoryUploader {
    root: PathBuf,
    base_url: String,
    owner: Option<String>,
    policy: UploadPolicy,
}

impl DirectoryUploader {
    /// Blobs are addressed as `file://<root>` unless a base URL is set.
    pub fn new(root: PathBuf, owner: Option<String>) -> Self {
        let base_url = format!("file://{}", root.display());
        Self {
            root,
            base_url,
            owner,
            policy: UploadPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn remote_url(&self, pathname: &str) -> String {
        let encoded: Vec<String> = pathname
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded.join("/"))
    }
}

/// `<stem>-<suffix>.<ext>`, keeping only the final path component of `name`.
fn suffixed_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();

    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{suffix}.{ext}"),
        _ => format!("{base}-{suffix}"),
    }
}

/// The owner becomes a single directory under the blob root.
fn is_safe_owner_dir(owner: &str) -> bool {
    !owner.is_empty()
        && owner != "."
        && owner != ".."
        && !owner.contains(['/', '\\', '\0'])
}

#[async_trait]
impl Uploader for DirectoryUploader {
    async fn upload(&self, file: &InputFile) -> Result<UploadResult, UploadError> {
        let owner = self.owner.as_deref().ok_or(UploadError::Unauthorized)?;
        if !is_safe_owner_dir(owner) {
            error!(owner, "owner cannot be used as a blob directory");
            return Err(UploadError::Other("Invalid owner name".to_string()));
        }
        let content_type = self.policy.check(file)?;

        let pathname = format!("{owner}/{}", suffixed_filename(file.name()));
        let target = self.root.join(&pathname);

        let stored = async {
            let bytes = file.bytes().await?;
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, bytes).await
        };
        if let Err(err) = stored.await {
            error!(file = file.name(), "blob write failed: {err}");
            return Err(UploadError::Other("Upload failed".to_string()));
        }

        info!(file = file.name(), path = %target.display(), "stored blob");
        Ok(UploadResult {
            remote_url: self.remote_url(&pathname),
            pathname,
            content_type: Some(content_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_wins_over_extension() {
        assert_eq!(guess_content_type("a.pdf", "image/png"), "image/png");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(guess_content_type("Photo.JPG", ""), "image/jpeg");
        assert_eq!(guess_content_type("notes.rtf", ""), "text/plain");
        assert_eq!(guess_content_type("Makefile", ""), "application/octet-stream");
    }

    #[test]
    fn policy_rejects_oversized_files() {
        let policy = UploadPolicy::new(1024 * 1024);
        let file = InputFile::from_bytes("a.pdf", "", vec![0u8; 1024 * 1024 + 1]);
        assert_eq!(
            policy.check(&file),
            Err(UploadError::Other(
                "File size should be less than 1MB".to_string()
            ))
        );
    }

    #[test]
    fn policy_rejects_unsupported_types() {
        let file = InputFile::from_bytes("tool.exe", "", vec![0u8; 4]);
        assert!(matches!(
            UploadPolicy::default().check(&file),
            Err(UploadError::Other(msg)) if msg.starts_with("Unsupported file type")
        ));
    }

    #[test]
    fn policy_accepts_office_documents() {
        let file = InputFile::from_bytes("deck.pptx", "", vec![0u8; 4]);
        assert_eq!(
            UploadPolicy::default().check(&file).unwrap(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
    }

    #[test]
    fn suffixed_filename_keeps_extension() {
        let name = suffixed_filename("dir/report.final.pdf");
        assert!(name.starts_with("report.final-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "report.final-".len() + SUFFIX_LEN + ".pdf".len());
        assert_ne!(suffixed_filename("a.pdf"), suffixed_filename("a.pdf"));
    }

    #[test]
    fn suffixed_filename_without_extension() {
        let name = suffixed_filename("README");
        assert!(name.starts_with("README-"));
        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn uploads_require_an_owner() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = DirectoryUploader::new(dir.path().to_path_buf(), None);
        let file = InputFile::from_bytes("a.pdf", "", vec![1u8]);
        assert_eq!(
            uploader.upload(&file).await,
            Err(UploadError::Unauthorized)
        );
    }

    #[test]
    fn owner_dir_must_be_a_single_component() {
        assert!(is_safe_owner_dir("ana"));
        assert!(is_safe_owner_dir("ana.b"));
        for bad in ["", ".", "..", "../x", "a/b", "a\\b"] {
            assert!(!is_safe_owner_dir(bad), "{bad}");
        }
    }

    #[tokio::test]
    async fn owner_cannot_escape_the_blob_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("blobs");
        let uploader = DirectoryUploader::new(root, Some("../x".into()));
        let file = InputFile::from_bytes("a.pdf", "", vec![1u8]);

        assert_eq!(
            uploader.upload(&file).await,
            Err(UploadError::Other("Invalid owner name".to_string()))
        );
        assert!(!dir.path().join("x").exists());
    }

    #[tokio::test]
    async fn stores_blob_under_owner_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = DirectoryUploader::new(dir.path().to_path_buf(), Some("ana".into()))
            .with_base_url("https://blobs.example/");
        let file = InputFile::from_bytes("my scan.png", "", vec![7u8, 8, 9]);

        let uploaded = uploader.upload(&file).await.unwrap();
        assert!(uploaded.pathname.starts_with("ana/my scan-"));
        assert!(uploaded.remote_url.starts_with("https://blobs.example/ana/my%20scan-"));
        assert_eq!(uploaded.content_type.as_deref(), Some("image/png"));

        let stored = std::fs::read(dir.path().join(&uploaded.pathname)).unwrap();
        assert_eq!(stored, vec![7u8, 8, 9]);
    }
}
