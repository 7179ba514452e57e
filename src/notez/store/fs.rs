use super::NoteStore;
use crate::error::{NotezError, Result};
use crate::model::{Note, NoteMetadata};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

const DATA_FILE: &str = "data.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn note_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("note-{}.md", id))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NotezError::Io)?;
        }
        Ok(())
    }

    fn load_metadata(&self) -> Result<HashMap<Uuid, NoteMetadata>> {
        let data_file = self.root.join(DATA_FILE);
        if !data_file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(data_file).map_err(NotezError::Io)?;
        let meta: HashMap<Uuid, NoteMetadata> =
            serde_json::from_str(&content).map_err(NotezError::Serialization)?;
        Ok(meta)
    }

    fn save_metadata(&self, meta: &HashMap<Uuid, NoteMetadata>) -> Result<()> {
        let data_file = self.root.join(DATA_FILE);
        let content = serde_json::to_string_pretty(meta).map_err(NotezError::Serialization)?;
        fs::write(data_file, content).map_err(NotezError::Io)?;
        Ok(())
    }

    fn read_content(&self, id: &Uuid) -> Result<String> {
        let path = self.note_path(id);
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(path).map_err(NotezError::Io)
    }
}

impl NoteStore for FileStore {
    fn save_note(&mut self, note: &Note) -> Result<()> {
        self.ensure_dir()?;

        // Content first, so metadata never points at a missing file.
        fs::write(self.note_path(&note.metadata.id), &note.content).map_err(NotezError::Io)?;

        let mut meta_map = self.load_metadata()?;
        meta_map.insert(note.metadata.id, note.metadata.clone());
        self.save_metadata(&meta_map)?;

        debug!(id = %note.metadata.id, "saved note");
        Ok(())
    }

    fn get_note(&self, id: &Uuid, owner: &str) -> Result<Note> {
        let meta_map = self.load_metadata()?;
        let metadata = meta_map
            .get(id)
            .filter(|m| m.owner == owner)
            .ok_or(NotezError::NoteNotFound(*id))?
            .clone();
        let content = self.read_content(id)?;
        Ok(Note { metadata, content })
    }

    fn list_notes(&self, owner: &str) -> Result<Vec<Note>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();
        for (id, metadata) in self.load_metadata()? {
            if metadata.owner != owner {
                continue;
            }
            let content = self.read_content(&id)?;
            notes.push(Note { metadata, content });
        }
        Ok(notes)
    }

    fn delete_note(&mut self, id: &Uuid, owner: &str) -> Result<bool> {
        let mut meta_map = self.load_metadata()?;
        if !meta_map.get(id).is_some_and(|m| m.owner == owner) {
            return Ok(false);
        }
        meta_map.remove(id);
        self.save_metadata(&meta_map)?;

        let path = self.note_path(id);
        if path.exists() {
            fs::remove_file(path).map_err(NotezError::Io)?;
        }
        Ok(true)
    }
}
