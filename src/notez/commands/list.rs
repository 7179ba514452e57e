use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::NoteStore;

use super::helpers::indexed_notes;

/// Lists the owner's notes, optionally narrowed to those matching `search`.
/// Indexes stay those of the full listing so they can be passed to `view`.
pub fn run<S: NoteStore>(store: &S, owner: &str, search: Option<&str>) -> Result<CmdResult> {
    let notes = indexed_notes(store, owner)?;
    let Some(query) = search.filter(|q| !q.trim().is_empty()) else {
        return Ok(CmdResult::default().with_listed_notes(notes));
    };

    let listed: Vec<_> = notes
        .into_iter()
        .filter(|dn| dn.note.matches(query))
        .collect();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "{} of your notes match \"{}\"",
        listed.len(),
        query.trim()
    )));
    Ok(result.with_listed_notes(listed))
}
