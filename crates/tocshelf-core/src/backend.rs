use std::path::Path;

use thiserror::Error;

use crate::{TextLine, TocEntry};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to read outline: {0}")]
    OutlineError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-page access to text lines and their font sizes.
pub trait SpanSource {
    /// Number of pages in the document.
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Text lines of the page at `page_index` (0-based), in reading order.
    fn page_lines(&self, page_index: usize) -> Result<Vec<TextLine>, BackendError>;
}

/// Access to the author-supplied outline (bookmarks) of a document.
pub trait OutlineSource {
    /// The outline flattened in document order. Empty when the document
    /// carries no outline.
    fn outline(&self) -> Result<Vec<TocEntry>, BackendError>;
}

/// An opened document that can serve both spans and its native outline.
pub trait PdfDocument: SpanSource + OutlineSource {}

impl<T: SpanSource + OutlineSource> PdfDocument for T {}

/// Trait for PDF parsing backends.
///
/// Implementors open a file and hand back a [`PdfDocument`]; the TOC
/// pipeline (outline fallback, heading inference, hierarchy) lives in
/// [`crate::extract`].
pub trait PdfBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}
