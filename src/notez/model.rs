use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user. Notes and uploaded blobs are scoped to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub owner: String,
}

impl Session {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NoteMetadata {
    pub fn new(owner: String, title: String, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            title,
            tags,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub metadata: NoteMetadata,
    pub content: String,
}

impl Note {
    pub fn new(owner: String, title: String, content: String, tags: Vec<String>) -> Self {
        Self {
            metadata: NoteMetadata::new(owner, title, tags),
            content,
        }
    }

    /// Case-insensitive match against title, content and tags.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        let tags = self.metadata.tags.join(" ").to_lowercase();
        self.metadata.title.to_lowercase().contains(&q)
            || self.content.to_lowercase().contains(&q)
            || tags.contains(&q)
    }
}
