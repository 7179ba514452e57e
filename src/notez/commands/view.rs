use crate::commands::{CmdResult, NoteSelector};
use crate::error::Result;
use crate::render::render;
use crate::store::NoteStore;

use super::helpers::resolve_selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Content rendered to markup.
    #[default]
    Preview,
    /// Content exactly as stored.
    Raw,
}

pub fn run<S: NoteStore>(
    store: &S,
    owner: &str,
    selector: &NoteSelector,
    mode: ViewMode,
) -> Result<CmdResult> {
    let shown = resolve_selector(store, owner, selector)?;
    let body = match mode {
        ViewMode::Preview => render(&shown.note.content),
        ViewMode::Raw => shown.note.content.clone(),
    };
    Ok(CmdResult::default()
        .with_rendered(body)
        .with_listed_notes(vec![shown]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn preview_renders_markup() {
        let store = StoreFixture::new()
            .with_note("ana", "T", "# Heading\n\n**bold** <b>", &[])
            .store;
        let result = run(&store, "ana", &NoteSelector::Index(1), ViewMode::Preview).unwrap();
        let html = result.rendered.unwrap();
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<strong>bold</strong> &lt;b&gt;"));
    }

    #[test]
    fn raw_returns_stored_content() {
        let store = StoreFixture::new()
            .with_note("ana", "T", "# Heading", &[])
            .store;
        let result = run(&store, "ana", &NoteSelector::Index(1), ViewMode::Raw).unwrap();
        assert_eq!(result.rendered.as_deref(), Some("# Heading"));
        assert_eq!(result.listed_notes[0].note.metadata.title, "T");
    }
}
