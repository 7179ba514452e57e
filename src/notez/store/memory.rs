use super::NoteStore;
use crate::error::{NotezError, Result};
use crate::model::Note;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    notes: HashMap<Uuid, Note>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for InMemoryStore {
    fn save_note(&mut self, note: &Note) -> Result<()> {
        self.notes.insert(note.metadata.id, note.clone());
        Ok(())
    }

    fn get_note(&self, id: &Uuid, owner: &str) -> Result<Note> {
        self.notes
            .get(id)
            .filter(|n| n.metadata.owner == owner)
            .cloned()
            .ok_or(NotezError::NoteNotFound(*id))
    }

    fn list_notes(&self, owner: &str) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .values()
            .filter(|n| n.metadata.owner == owner)
            .cloned()
            .collect())
    }

    fn delete_note(&mut self, id: &Uuid, owner: &str) -> Result<bool> {
        let owned = self
            .notes
            .get(id)
            .is_some_and(|n| n.metadata.owner == owner);
        if owned {
            self.notes.remove(id);
        }
        Ok(owned)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_notes(mut self, count: usize, owner: &str) -> Self {
            for i in 0..count {
                let note = Note::new(
                    owner.to_string(),
                    format!("Test Note {}", i + 1),
                    format!("Content for note {}", i + 1),
                    Vec::new(),
                );
                self.store.save_note(&note).unwrap();
            }
            self
        }

        pub fn with_note(mut self, owner: &str, title: &str, content: &str, tags: &[&str]) -> Self {
            let tags = tags.iter().map(|t| t.to_string()).collect();
            let note = Note::new(owner.to_string(), title.to_string(), content.to_string(), tags);
            self.store.save_note(&note).unwrap();
            self
        }
    }
}
