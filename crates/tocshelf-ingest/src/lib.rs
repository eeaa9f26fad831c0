use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

// Re-export domain types for convenience
pub use tocshelf_core::{Extraction, HeadingRules, TocEntry, TocNode, TocOrigin};

use tocshelf_core::{BackendError, IdGenerator, PdfBackend};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF extraction error: {0}")]
    Pdf(#[from] BackendError),
    #[error("not a PDF file: {0}")]
    NotPdf(String),
}

/// The backend used when the caller does not supply one.
///
/// With the `pdf` feature (default) this is MuPDF; without it every open
/// fails with a descriptive error.
pub fn default_backend() -> Arc<dyn PdfBackend> {
    #[cfg(feature = "pdf")]
    {
        Arc::new(tocshelf_pdf_mupdf::MupdfBackend::new())
    }
    #[cfg(not(feature = "pdf"))]
    {
        Arc::new(NoPdfSupport)
    }
}

#[cfg(not(feature = "pdf"))]
struct NoPdfSupport;

#[cfg(not(feature = "pdf"))]
impl PdfBackend for NoPdfSupport {
    fn open(&self, _path: &Path) -> Result<Box<dyn tocshelf_core::PdfDocument>, BackendError> {
        Err(BackendError::OpenError(
            "PDF support not compiled in (enable the `pdf` feature of tocshelf-ingest)".into(),
        ))
    }
}

/// Extract the TOC of a PDF file with the default backend.
///
/// Only `.pdf` paths are accepted; the file name of `path` becomes every
/// node's `fileName`.
pub fn extract_toc(
    path: &Path,
    rules: &HeadingRules,
    ids: &mut dyn IdGenerator,
) -> Result<Extraction, IngestError> {
    extract_toc_with(default_backend().as_ref(), path, rules, ids)
}

/// [`extract_toc`] with an explicit backend.
pub fn extract_toc_with(
    backend: &dyn PdfBackend,
    path: &Path,
    rules: &HeadingRules,
    ids: &mut dyn IdGenerator,
) -> Result<Extraction, IngestError> {
    let is_pdf = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(tocshelf_core::is_pdf_filename);
    if !is_pdf {
        return Err(IngestError::NotPdf(path.display().to_string()));
    }

    let extraction = tocshelf_core::extract_file(backend, path, rules, ids)?;
    tracing::info!(
        path = %path.display(),
        origin = ?extraction.origin,
        nodes = extraction.tree.len(),
        "extracted TOC"
    );
    Ok(extraction)
}
