use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extract;
pub mod heuristic;
pub mod hierarchy;
pub mod ids;
pub mod library;
pub mod store;

// Re-export for convenience
pub use backend::{BackendError, OutlineSource, PdfBackend, PdfDocument, SpanSource};
pub use config_file::Settings;
pub use extract::{Extraction, TocOrigin, extract_file, extract_toc};
pub use heuristic::{HeadingRules, infer_headings};
pub use hierarchy::{OutlineTreeNode, TocTree, build_hierarchy, nest_nodes};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use library::{DeleteOutcome, DocumentLibrary, UploadOutcome, is_pdf_filename};
pub use store::{DocumentRecord, DocumentStore, JsonFileStore, MemoryStore, StoreError};

/// A flat outline entry, before hierarchy reconstruction.
///
/// Entries arrive in document order. `level` is 1-based and need not be
/// contiguous between neighbours; `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u32,
    pub title: String,
    pub page: u32,
}

impl TocEntry {
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// An outline entry after hierarchy reconstruction, linked to its parent
/// and children by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocNode {
    pub id: String,
    pub level: u32,
    pub title: String,
    pub page: u32,
    pub file_name: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub child_ids: Vec<String>,
}

impl TocNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Drop the tree links, keeping only `(level, title, page)`.
    pub fn to_entry(&self) -> TocEntry {
        TocEntry {
            level: self.level,
            title: self.title.clone(),
            page: self.page,
        }
    }
}

/// A run of text sharing one font size, as reported by the PDF backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// One visual line of a page: its spans in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Span texts joined with a single space, trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Font size of the first span. Spans within a line are treated as
    /// uniform.
    pub fn font_size(&self) -> Option<f32> {
        self.spans.first().map(|s| s.font_size)
    }
}

/// All text lines of a single page, in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSpans {
    pub lines: Vec<TextLine>,
}

impl PageSpans {
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("PDF processing error: {0}")]
    Backend(#[from] BackendError),
    #[error("document store error: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
}
