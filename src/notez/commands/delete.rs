use crate::commands::{CmdMessage, CmdResult, NoteSelector};
use crate::error::{NotezError, Result};
use crate::store::NoteStore;

use super::helpers::resolve_selector;

pub fn run<S: NoteStore>(store: &mut S, owner: &str, selector: &NoteSelector) -> Result<CmdResult> {
    let target = resolve_selector(store, owner, selector)?;
    let id = target.note.metadata.id;
    if !store.delete_note(&id, owner)? {
        return Err(NotezError::NoteNotFound(id));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Note deleted ({}): {}",
        target.index, target.note.metadata.title
    )));
    Ok(result.with_affected_notes(vec![target.note]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::list;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn removes_the_selected_note() {
        let mut store = StoreFixture::new().with_notes(2, "ana").store;
        let result = run(&mut store, "ana", &NoteSelector::Index(1)).unwrap();
        assert_eq!(result.affected_notes.len(), 1);
        assert_eq!(list::run(&store, "ana", None).unwrap().listed_notes.len(), 1);
    }

    #[test]
    fn cannot_delete_someone_elses_note() {
        let mut store = StoreFixture::new().with_notes(1, "bo").store;
        let id = store.list_notes("bo").unwrap()[0].metadata.id;
        assert!(matches!(
            run(&mut store, "ana", &NoteSelector::Id(id.to_string())),
            Err(NotezError::NoteNotFound(missing)) if missing == id
        ));
        assert_eq!(store.list_notes("bo").unwrap().len(), 1);
    }
}
