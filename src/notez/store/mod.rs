//! # Storage Layer
//!
//! Notes are persisted behind the [`NoteStore`] trait so the command layer
//! never touches the filesystem directly.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production file-based storage
//!   - Metadata for every note in `data.json`
//!   - Content in individual files: `note-{uuid}.md`
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Ownership
//!
//! Every read and delete takes the owner. A note belonging to someone else
//! behaves exactly like a missing one.
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── data.json           # Metadata for all notes (JSON object keyed by id)
//! ├── note-{uuid}.md      # Individual note content files
//! ├── blobs/              # Uploaded originals (see upload.rs)
//! └── config.json         # Configuration
//! ```

use crate::error::Result;
use crate::model::Note;
use uuid::Uuid;

pub mod fs;
pub mod memory;

pub trait NoteStore {
    /// Save a note (create or replace)
    fn save_note(&mut self, note: &Note) -> Result<()>;

    /// Get one of `owner`'s notes by ID
    fn get_note(&self, id: &Uuid, owner: &str) -> Result<Note>;

    /// List all of `owner`'s notes, in no particular order
    fn list_notes(&self, owner: &str) -> Result<Vec<Note>>;

    /// Delete one of `owner`'s notes. Returns false when there was nothing to delete.
    fn delete_note(&mut self, id: &Uuid, owner: &str) -> Result<bool>;
}
