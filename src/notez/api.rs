//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the ingestion
//! pipeline. Every UI goes through [`NotezApi`].
//!
//! The facade:
//! - **Enforces the session**: every note operation needs a signed-in owner
//! - **Normalizes inputs** (selector strings into [`NoteSelector`]s)
//! - **Returns structured types** (`Result<CmdResult>`), never prints
//!
//! `NotezApi<S: NoteStore>` is generic over the storage backend:
//! `NotezApi<FileStore>` in the binary, `NotezApi<InMemoryStore>` in tests.

use crate::commands::{self, view::ViewMode, CmdMessage, CmdResult, NoteSelector};
use crate::draft::NoteDraft;
use crate::error::{NotezError, Result};
use crate::ingest::{InputFile, Ingestor};
use crate::model::Session;
use crate::store::NoteStore;
use tracing::debug;

pub struct NotezApi<S: NoteStore> {
    store: S,
    session: Option<Session>,
}

impl<S: NoteStore> NotezApi<S> {
    pub fn new(store: S, session: Option<Session>) -> Self {
        Self { store, session }
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(NotezError::Unauthorized)
    }

    pub fn create_note(
        &mut self,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Result<CmdResult> {
        let owner = self.require_session()?.owner.clone();
        commands::create::run(&mut self.store, &owner, title, content, tags)
    }

    pub fn list_notes(&self, search: Option<&str>) -> Result<CmdResult> {
        let session = self.require_session()?;
        commands::list::run(&self.store, &session.owner, search)
    }

    pub fn view_note(&self, selector: &str, mode: ViewMode) -> Result<CmdResult> {
        let session = self.require_session()?;
        let selector = parse_selector(selector)?;
        commands::view::run(&self.store, &session.owner, &selector, mode)
    }

    pub fn delete_note(&mut self, selector: &str) -> Result<CmdResult> {
        let owner = self.require_session()?.owner.clone();
        let selector = parse_selector(selector)?;
        commands::delete::run(&mut self.store, &owner, &selector)
    }

    /// Ingests `files` into `draft` and stores the result as a new note.
    ///
    /// Per-file failures reach the ingestor's notification sink; the note is
    /// still created from whatever succeeded, as long as the draft validates.
    pub async fn add_files(
        &mut self,
        ingestor: &Ingestor,
        draft: NoteDraft,
        files: Vec<InputFile>,
    ) -> Result<CmdResult> {
        self.require_session()?;
        let draft = ingest_into(ingestor, draft, files).await?;
        draft.validate()?;

        let NoteDraft {
            title,
            content,
            tags,
            previews,
            ..
        } = draft;
        let result = self.create_note(title, content, tags)?;
        Ok(result.with_previews(previews))
    }

    /// Ingests `files` into `draft` without storing anything.
    pub async fn preview_files(
        &self,
        ingestor: &Ingestor,
        draft: NoteDraft,
        files: Vec<InputFile>,
    ) -> Result<CmdResult> {
        self.require_session()?;
        let draft = ingest_into(ingestor, draft, files).await?;

        let mut result = CmdResult::default().with_previews(draft.previews.clone());
        if draft.content.trim().is_empty() {
            result.add_message(CmdMessage::warning("Nothing could be extracted"));
        }
        Ok(result.with_draft(draft))
    }
}

async fn ingest_into(
    ingestor: &Ingestor,
    mut draft: NoteDraft,
    files: Vec<InputFile>,
) -> Result<NoteDraft> {
    let names: Vec<String> = files.iter().map(|f| f.name().to_string()).collect();
    debug!(count = names.len(), "ingesting files into draft");
    let outcome = ingestor.ingest(files).await?;
    draft.absorb(&names, &outcome);
    Ok(draft)
}

pub fn parse_selector(input: &str) -> Result<NoteSelector> {
    if input.trim().is_empty() {
        return Err(NotezError::Api("A note index or id is required".to_string()));
    }
    Ok(NoteSelector::parse(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, UploadError};
    use crate::ingest::fixtures::{RecordingSink, StubExtractor, StubUploader};
    use crate::store::memory::InMemoryStore;
    use std::sync::Arc;

    fn api() -> NotezApi<InMemoryStore> {
        NotezApi::new(InMemoryStore::new(), Some(Session::new("ana")))
    }

    fn ingestor(extractor: StubExtractor, uploader: StubUploader) -> (Ingestor, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let ingestor = Ingestor::new(Arc::new(extractor), Arc::new(uploader), sink.clone());
        (ingestor, sink)
    }

    #[test]
    fn every_note_operation_needs_a_session() {
        let mut api = NotezApi::new(InMemoryStore::new(), None);
        assert!(matches!(
            api.create_note("t".into(), "c".into(), Vec::new()),
            Err(NotezError::Unauthorized)
        ));
        assert!(matches!(api.list_notes(None), Err(NotezError::Unauthorized)));
        assert!(matches!(
            api.view_note("1", ViewMode::Raw),
            Err(NotezError::Unauthorized)
        ));
        assert!(matches!(api.delete_note("1"), Err(NotezError::Unauthorized)));
    }

    #[test]
    fn blank_selector_is_rejected() {
        assert!(matches!(parse_selector("  "), Err(NotezError::Api(_))));
    }

    #[test]
    fn create_view_delete() {
        let mut api = api();
        api.create_note("Title".into(), "*hi*".into(), Vec::new())
            .unwrap();

        let viewed = api.view_note("1", ViewMode::Preview).unwrap();
        assert_eq!(viewed.rendered.as_deref(), Some("<p><em>hi</em></p>"));

        api.delete_note("1").unwrap();
        assert!(api.list_notes(None).unwrap().listed_notes.is_empty());
    }

    #[tokio::test]
    async fn add_files_stores_merged_note() {
        let (ingestor, sink) = ingestor(
            StubExtractor::default().succeed("slides.pdf", "slide text", Some("https://b/s.pdf")),
            StubUploader::default(),
        );
        let mut api = api();
        let files = vec![
            InputFile::from_bytes("a.md", "text/markdown", b"# Intro".to_vec()),
            InputFile::from_bytes("slides.pdf", "application/pdf", vec![0u8; 8]),
        ];

        let result = api
            .add_files(&ingestor, NoteDraft::default(), files)
            .await
            .unwrap();
        let note = &result.affected_notes[0];
        assert_eq!(note.metadata.title, "Merged notes (2 files)");
        assert!(note.content.contains("# Intro"));
        assert!(note.content.contains("slide text"));
        assert!(note.content.contains("[slides.pdf](https://b/s.pdf)"));
        assert_eq!(result.previews.len(), 2);
        assert!(sink.notifications().is_empty());
    }

    #[tokio::test]
    async fn add_files_with_nothing_usable_fails_validation() {
        let (ingestor, sink) = ingestor(
            StubExtractor::default().fail("scan.png", ExtractionError::Other("bad".into())),
            StubUploader::default().fail("scan.png", UploadError::Other("down".into())),
        );
        let mut api = api();
        let files = vec![InputFile::from_bytes("scan.png", "image/png", vec![1u8])];

        let err = api
            .add_files(&ingestor, NoteDraft::default(), files)
            .await
            .unwrap_err();
        assert!(matches!(err, NotezError::BadRequest(_)));
        assert_eq!(sink.notifications().len(), 1);
        assert!(api.list_notes(None).unwrap().listed_notes.is_empty());
    }

    #[tokio::test]
    async fn preview_files_does_not_store() {
        let (ingestor, _sink) = ingestor(StubExtractor::default(), StubUploader::default());
        let api = api();
        let files = vec![InputFile::from_bytes("notes.txt", "", b"hello".to_vec())];

        let result = api
            .preview_files(&ingestor, NoteDraft::default(), files)
            .await
            .unwrap();
        let draft = result.draft.unwrap();
        assert_eq!(draft.title, "notes");
        assert_eq!(draft.content, "hello");
        assert!(api.list_notes(None).unwrap().listed_notes.is_empty());
    }
}
