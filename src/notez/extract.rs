//! Extraction collaborators.
//!
//! [`CommandExtractor`] pipes the document through an external program (for
//! example `pdftotext - -`) and stores the original through an [`Uploader`],
//! so a successful extraction yields both text and a link.
//! [`UnconfiguredExtractor`] stands in when no program is configured; every
//! binary file then goes through the upload fallback.

use crate::error::{ExtractionError, UploadError};
use crate::ingest::{ExtractionResult, Extractor, InputFile, Uploader};
use crate::upload::guess_content_type;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const GENERIC_FAILURE: &str = "Extraction failed";

pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    owner: Option<String>,
    uploader: Arc<dyn Uploader>,
}

impl CommandExtractor {
    /// `command` is the program followed by its arguments. Returns `None` when
    /// it is empty.
    pub fn new(
        command: &[String],
        owner: Option<String>,
        uploader: Arc<dyn Uploader>,
    ) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            owner,
            uploader,
        })
    }

    async fn run_program(&self, input: Vec<u8>) -> Result<String, ExtractionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                ExtractionError::Other(format!("could not start {}: {err}", self.program))
            })?;

        // Feed stdin from a separate task so a chatty program can't deadlock
        // against a full stdout pipe.
        let stdin = child.stdin.take();
        let feeder = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                // A program that exits early closes the pipe; its exit status
                // reports the problem.
                let _ = stdin.write_all(&input).await;
            }
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| ExtractionError::Other(format!("{GENERIC_FAILURE}: {err}")))?;
        let _ = feeder.await;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or(GENERIC_FAILURE);
            return Err(ExtractionError::Other(reason.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Extractor for CommandExtractor {
    async fn extract(&self, file: &InputFile) -> Result<ExtractionResult, ExtractionError> {
        if self.owner.is_none() {
            return Err(ExtractionError::Unauthorized);
        }

        let input = file
            .bytes()
            .await
            .map_err(|err| ExtractionError::Other(format!("{GENERIC_FAILURE}: {err}")))?;
        debug!(file = file.name(), program = %self.program, "running extractor");
        let text = self.run_program(input).await?;

        let stored = self.uploader.upload(file).await.map_err(|err| match err {
            UploadError::Unauthorized => ExtractionError::Unauthorized,
            UploadError::Other(reason) => ExtractionError::Other(reason),
        })?;

        Ok(ExtractionResult {
            remote_url: Some(stored.remote_url),
            filename: file.name().to_string(),
            content_type: stored
                .content_type
                .or_else(|| Some(guess_content_type(file.name(), file.declared_type()))),
            text,
        })
    }
}

/// Fails every extraction so callers fall back to a plain upload.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredExtractor;

#[async_trait]
impl Extractor for UnconfiguredExtractor {
    async fn extract(&self, file: &InputFile) -> Result<ExtractionResult, ExtractionError> {
        debug!(file = file.name(), "no extractor configured");
        Err(ExtractionError::Other(
            "no extraction service configured".to_string(),
        ))
    }
}
