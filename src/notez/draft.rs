//! Note drafts.
//!
//! A draft is what the user is composing before it becomes a stored note.
//! Ingested files are folded into it with [`NoteDraft::absorb`], which appends
//! their merged content after whatever was already typed.

use crate::error::{NotezError, Result};
use crate::ingest::IngestionOutcome;
use crate::preview::PreviewDescriptor;

const CONTENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub selected_files: Vec<String>,
    pub previews: Vec<PreviewDescriptor>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags,
            ..Self::default()
        }
    }

    /// Folds an ingestion outcome for `file_names` into the draft.
    pub fn absorb(&mut self, file_names: &[String], outcome: &IngestionOutcome) {
        if file_names.is_empty() {
            return;
        }

        let merged = outcome.merged();
        if !merged.is_empty() {
            if self.content.is_empty() {
                self.content = merged;
            } else {
                self.content = format!("{}{CONTENT_SEPARATOR}{}", self.content, merged);
            }
        }

        if self.title.is_empty() {
            self.title = suggest_title(file_names);
        }
        self.selected_files = file_names.to_vec();
        self.previews.extend(outcome.previews.iter().cloned());
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(NotezError::BadRequest(
                "Please provide title and content".to_string(),
            ));
        }
        Ok(())
    }
}

/// One file: its name without the final extension. Several: a count.
pub fn suggest_title(file_names: &[String]) -> String {
    match file_names {
        [] => String::new(),
        [single] => match single.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => single.clone(),
        },
        many => format!("Merged notes ({} files)", many.len()),
    }
}

/// `"a, b,,c "` -> `["a", "b", "c"]`
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn outcome(text: &str, links: &str) -> IngestionOutcome {
        IngestionOutcome {
            composed_text: text.to_string(),
            composed_links: links.to_string(),
            previews: vec![PreviewDescriptor::local("a.txt", "text/plain")],
            failed: Vec::new(),
        }
    }

    #[test]
    fn absorb_fills_empty_draft() {
        let mut draft = NoteDraft::default();
        draft.absorb(&names(&["lecture.notes.pdf"]), &outcome("body", ""));
        assert_eq!(draft.content, "body");
        assert_eq!(draft.title, "lecture.notes");
        assert_eq!(draft.selected_files, names(&["lecture.notes.pdf"]));
        assert_eq!(draft.previews.len(), 1);
    }

    #[test]
    fn absorb_appends_after_typed_content() {
        let mut draft = NoteDraft::new("Mine", "typed", Vec::new());
        draft.absorb(&names(&["a.txt", "b.png"]), &outcome("text", "- [b.png](u)"));
        assert_eq!(draft.content, "typed\n\ntext\n\n- [b.png](u)");
        assert_eq!(draft.title, "Mine");
    }

    #[test]
    fn absorb_with_nothing_merged_keeps_content() {
        let mut draft = NoteDraft::new("", "typed", Vec::new());
        draft.absorb(&names(&["a.pdf", "b.pdf"]), &outcome("", ""));
        assert_eq!(draft.content, "typed");
        assert_eq!(draft.title, "Merged notes (2 files)");
    }

    #[test]
    fn absorb_without_files_is_a_no_op() {
        let mut draft = NoteDraft::new("", "typed", Vec::new());
        draft.absorb(&[], &outcome("text", ""));
        assert_eq!(draft, NoteDraft::new("", "typed", Vec::new()));
    }

    #[test]
    fn title_suggestions() {
        assert_eq!(suggest_title(&names(&["README"])), "README");
        assert_eq!(suggest_title(&names(&[".env"])), ".env");
        assert_eq!(suggest_title(&names(&["a", "b", "c"])), "Merged notes (3 files)");
    }

    #[test]
    fn tags_are_trimmed_and_blank_ones_dropped() {
        assert_eq!(parse_tags("a, b,,c "), names(&["a", "b", "c"]));
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn validate_requires_title_and_content() {
        assert!(NoteDraft::new("t", "c", Vec::new()).validate().is_ok());
        assert!(matches!(
            NoteDraft::new(" ", "c", Vec::new()).validate(),
            Err(NotezError::BadRequest(m)) if m == "Please provide title and content"
        ));
        assert!(NoteDraft::new("t", "\n", Vec::new()).validate().is_err());
    }
}
