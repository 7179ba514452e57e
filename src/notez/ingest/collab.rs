//! Collaborator seams for the ingestion pipeline.
//!
//! Extraction and blob upload live outside this crate's core: the pipeline only
//! sees these traits. Production wiring uses [`crate::extract`] and
//! [`crate::upload`]; tests plug in stubs.

use super::{ExtractionResult, InputFile, UploadResult};
use crate::commands::CmdMessage;
use crate::error::{ExtractionError, UploadError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Turns a binary document into text, storing the original along the way.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, file: &InputFile) -> Result<ExtractionResult, ExtractionError>;
}

/// Stores a file and hands back where it can be fetched from.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &InputFile) -> Result<UploadResult, UploadError>;
}

/// Receives user-visible, non-fatal per-file failures.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, file_name: &str, message: &str);
}

/// Sink that collects notifications as error messages for a `CmdResult`.
#[derive(Debug, Default)]
pub struct MessageSink {
    messages: Mutex<Vec<CmdMessage>>,
}

impl MessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains everything collected so far.
    pub fn take(&self) -> Vec<CmdMessage> {
        let mut guard = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl NotificationSink for MessageSink {
    fn notify(&self, file_name: &str, message: &str) {
        tracing::warn!(file = file_name, "{message}");
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(CmdMessage::error(format!("{file_name}: {message}")));
    }
}
