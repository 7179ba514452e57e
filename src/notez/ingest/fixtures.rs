// --- Test Fixtures ---
//
// Scripted collaborators keyed by file name. Anything not scripted fails with
// `Other("unscripted")`.

use super::{ExtractionResult, Extractor, InputFile, NotificationSink, UploadResult, Uploader};
use crate::error::{ExtractionError, UploadError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct StubExtractor {
    script: HashMap<String, Result<ExtractionResult, ExtractionError>>,
    calls: Arc<AtomicUsize>,
}

impl StubExtractor {
    pub fn succeed(mut self, name: &str, text: &str, remote_url: Option<&str>) -> Self {
        self.script.insert(
            name.to_string(),
            Ok(ExtractionResult {
                remote_url: remote_url.map(String::from),
                filename: name.to_string(),
                content_type: Some("application/pdf".to_string()),
                text: text.to_string(),
            }),
        );
        self
    }

    pub fn fail(mut self, name: &str, err: ExtractionError) -> Self {
        self.script.insert(name.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self, file: &InputFile) -> Result<ExtractionResult, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .get(file.name())
            .cloned()
            .unwrap_or_else(|| Err(ExtractionError::Other("unscripted".to_string())))
    }
}

#[derive(Default)]
pub struct StubUploader {
    script: HashMap<String, Result<UploadResult, UploadError>>,
}

impl StubUploader {
    pub fn succeed(mut self, name: &str, remote_url: &str) -> Self {
        self.script.insert(
            name.to_string(),
            Ok(UploadResult {
                remote_url: remote_url.to_string(),
                pathname: name.to_string(),
                content_type: Some("application/octet-stream".to_string()),
            }),
        );
        self
    }

    pub fn fail(mut self, name: &str, err: UploadError) -> Self {
        self.script.insert(name.to_string(), Err(err));
        self
    }
}

#[async_trait]
impl Uploader for StubUploader {
    async fn upload(&self, file: &InputFile) -> Result<UploadResult, UploadError> {
        self.script
            .get(file.name())
            .cloned()
            .unwrap_or_else(|| Err(UploadError::Other("unscripted".to_string())))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn notifications(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, file_name: &str, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((file_name.to_string(), message.to_string()));
    }
}
