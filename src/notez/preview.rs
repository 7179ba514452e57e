//! Preview descriptors for processed files.
//!
//! A descriptor only carries what a UI needs to show a file next to the note:
//! its name, where the original lives (if it was stored remotely) and its
//! content type. [`PreviewDescriptor::kind`] picks the presentation.

use serde::{Deserialize, Serialize};

const OFFICE_VIEWER: &str = "https://view.officeapps.live.com/op/embed.aspx?src=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewDescriptor {
    pub name: String,
    pub remote_url: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Word,
    Spreadsheet,
    Presentation,
    /// Stored remotely but not embeddable; shown as a plain link.
    Link,
    /// Nothing stored remotely (e.g. text read locally).
    Unavailable,
}

impl PreviewDescriptor {
    pub fn local(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_url: None,
            content_type: Some(content_type.into()),
        }
    }

    pub fn remote(
        name: impl Into<String>,
        remote_url: Option<String>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            remote_url,
            content_type,
        }
    }

    pub fn kind(&self) -> PreviewKind {
        if self.remote_url.is_none() {
            return PreviewKind::Unavailable;
        }

        let ct = self
            .content_type
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        if ct.starts_with("image/") {
            PreviewKind::Image
        } else if ct == "application/pdf" {
            PreviewKind::Pdf
        } else if ct.contains("wordprocessingml") || ct.contains("msword") {
            PreviewKind::Word
        } else if ct.contains("spreadsheetml") || ct.contains("ms-excel") || ct == "text/csv" {
            PreviewKind::Spreadsheet
        } else if ct.contains("presentation") || ct.contains("powerpoint") {
            PreviewKind::Presentation
        } else {
            PreviewKind::Link
        }
    }

    /// URL suitable for embedding or opening the original file.
    pub fn viewer_url(&self) -> Option<String> {
        let url = self.remote_url.as_deref()?;
        match self.kind() {
            PreviewKind::Unavailable => None,
            PreviewKind::Image | PreviewKind::Link => Some(url.to_string()),
            PreviewKind::Pdf => Some(format!("{url}#view=FitH")),
            PreviewKind::Word | PreviewKind::Spreadsheet | PreviewKind::Presentation => {
                Some(format!("{OFFICE_VIEWER}{}", urlencoding::encode(url)))
            }
        }
    }
}

impl std::fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PreviewKind::Image => "image",
            PreviewKind::Pdf => "pdf",
            PreviewKind::Word => "word",
            PreviewKind::Spreadsheet => "spreadsheet",
            PreviewKind::Presentation => "presentation",
            PreviewKind::Link => "file",
            PreviewKind::Unavailable => "no preview",
        };
        f.write_str(label)
    }
}
