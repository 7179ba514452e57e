use crate::commands::{DisplayNote, NoteSelector};
use crate::error::{NotezError, Result};
use crate::model::Note;
use crate::store::NoteStore;
use uuid::Uuid;

/// Owner's notes, newest first, numbered from 1.
pub fn indexed_notes<S: NoteStore>(store: &S, owner: &str) -> Result<Vec<DisplayNote>> {
    let mut notes = store.list_notes(owner)?;
    notes.sort_by(|a, b| {
        b.metadata
            .created_at
            .cmp(&a.metadata.created_at)
            .then_with(|| a.metadata.id.cmp(&b.metadata.id))
    });
    Ok(notes
        .into_iter()
        .enumerate()
        .map(|(i, note)| DisplayNote { index: i + 1, note })
        .collect())
}

pub fn resolve_selector<S: NoteStore>(
    store: &S,
    owner: &str,
    selector: &NoteSelector,
) -> Result<DisplayNote> {
    let indexed = indexed_notes(store, owner)?;
    match selector {
        NoteSelector::Index(i) => indexed
            .into_iter()
            .find(|dn| dn.index == *i)
            .ok_or_else(|| NotezError::Api(format!("Index {} not found", i))),
        NoteSelector::Id(prefix) => {
            let mut hits: Vec<DisplayNote> = indexed
                .into_iter()
                .filter(|dn| dn.note.metadata.id.to_string().starts_with(prefix.as_str()))
                .collect();
            match hits.len() {
                0 => match Uuid::parse_str(prefix) {
                    Ok(id) => Err(NotezError::NoteNotFound(id)),
                    Err(_) => Err(NotezError::Api(format!("No note matches id {}", prefix))),
                },
                1 => Ok(hits.remove(0)),
                n => Err(NotezError::Api(format!(
                    "Id prefix {} is ambiguous ({} notes)",
                    prefix, n
                ))),
            }
        }
    }
}

pub fn note_by_selector<S: NoteStore>(
    store: &S,
    owner: &str,
    selector: &NoteSelector,
) -> Result<Note> {
    Ok(resolve_selector(store, owner, selector)?.note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use chrono::{Duration, Utc};

    fn seed(store: &mut InMemoryStore, title: &str, age_minutes: i64) -> Note {
        let mut note = Note::new("ana".into(), title.into(), "body".into(), Vec::new());
        note.metadata.created_at = Utc::now() - Duration::minutes(age_minutes);
        store.save_note(&note).unwrap();
        note
    }

    #[test]
    fn newest_note_gets_index_one() {
        let mut store = InMemoryStore::new();
        seed(&mut store, "old", 10);
        seed(&mut store, "new", 1);

        let listed = indexed_notes(&store, "ana").unwrap();
        assert_eq!(listed[0].index, 1);
        assert_eq!(listed[0].note.metadata.title, "new");
        assert_eq!(listed[1].note.metadata.title, "old");
    }

    #[test]
    fn resolves_by_id_prefix() {
        let mut store = InMemoryStore::new();
        let note = seed(&mut store, "only", 1);
        let prefix = note.metadata.id.to_string()[..8].to_string();

        let found = note_by_selector(&store, "ana", &NoteSelector::Id(prefix)).unwrap();
        assert_eq!(found.metadata.id, note.metadata.id);
    }

    #[test]
    fn full_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            resolve_selector(&store, "ana", &NoteSelector::Id(id.to_string())),
            Err(NotezError::NoteNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn unknown_index_is_an_error() {
        let store = InMemoryStore::new();
        assert!(matches!(
            resolve_selector(&store, "ana", &NoteSelector::Index(1)),
            Err(NotezError::Api(_))
        ));
    }
}
