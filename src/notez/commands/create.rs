use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotezError, Result};
use crate::model::Note;
use crate::store::NoteStore;
use tracing::info;

pub fn run<S: NoteStore>(
    store: &mut S,
    owner: &str,
    title: String,
    content: String,
    tags: Vec<String>,
) -> Result<CmdResult> {
    let title = title.trim().to_string();
    if title.is_empty() || content.trim().is_empty() {
        return Err(NotezError::BadRequest(
            "Both title and content are required.".to_string(),
        ));
    }

    let note = Note::new(owner.to_string(), title, content, tags);
    store.save_note(&note)?;
    info!(id = %note.metadata.id, "created note");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Note created: {}",
        note.metadata.title
    )));
    Ok(result.with_affected_notes(vec![note]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn stores_trimmed_title() {
        let mut store = InMemoryStore::new();
        let result = run(
            &mut store,
            "ana",
            "  Week 1  ".into(),
            "notes".into(),
            vec!["bio".into()],
        )
        .unwrap();

        assert_eq!(result.affected_notes[0].metadata.title, "Week 1");
        let stored = store.list_notes("ana").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].metadata.tags, vec!["bio".to_string()]);
    }

    #[test]
    fn rejects_blank_title_or_content() {
        let mut store = InMemoryStore::new();
        for (title, content) in [("   ", "body"), ("Title", " \n ")] {
            let err = run(&mut store, "ana", title.into(), content.into(), Vec::new()).unwrap_err();
            assert!(matches!(err, NotezError::BadRequest(ref m) if m == "Both title and content are required."));
        }
        assert!(store.list_notes("ana").unwrap().is_empty());
    }
}
