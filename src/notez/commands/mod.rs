use crate::draft::NoteDraft;
use crate::model::Note;
use crate::preview::PreviewDescriptor;
use std::fmt;

pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A note together with its 1-based position in the newest-first listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNote {
    pub index: usize,
    pub note: Note,
}

/// How a user points at a note: its listing index or a prefix of its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSelector {
    Index(usize),
    Id(String),
}

impl NoteSelector {
    /// A positive integer is an index; anything else is treated as an id prefix.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => NoteSelector::Index(n),
            _ => NoteSelector::Id(trimmed.to_lowercase()),
        }
    }
}

impl fmt::Display for NoteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteSelector::Index(i) => write!(f, "{}", i),
            NoteSelector::Id(prefix) => write!(f, "{}", prefix),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<Note>,
    pub listed_notes: Vec<DisplayNote>,
    /// Rendered (or raw) body produced by `view`.
    pub rendered: Option<String>,
    pub previews: Vec<PreviewDescriptor>,
    /// Draft assembled by `preview_files`, never stored.
    pub draft: Option<NoteDraft>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_notes(mut self, notes: Vec<Note>) -> Self {
        self.affected_notes = notes;
        self
    }

    pub fn with_listed_notes(mut self, notes: Vec<DisplayNote>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn with_previews(mut self, previews: Vec<PreviewDescriptor>) -> Self {
        self.previews = previews;
        self
    }

    pub fn with_draft(mut self, draft: NoteDraft) -> Self {
        self.draft = Some(draft);
        self
    }
}
