use std::path::Path;

use crate::backend::{BackendError, PdfBackend, PdfDocument};
use crate::heuristic::{HeadingRules, infer_from_source};
use crate::hierarchy::{TocTree, build_hierarchy};
use crate::ids::IdGenerator;

/// Where the flat entries of an extraction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocOrigin {
    /// The document's embedded outline.
    Outline,
    /// Guessed from font sizes because the outline was empty.
    Headings,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub origin: TocOrigin,
    pub tree: TocTree,
}

impl Extraction {
    /// All nodes in creation order. This is the persisted shape.
    pub fn into_nodes(self) -> Vec<crate::TocNode> {
        self.tree.into_nodes()
    }
}

/// Build the TOC of an opened document.
///
/// Pipeline:
/// 1. Read the embedded outline
/// 2. If it is empty, infer level-1 headings from page spans
/// 3. Reconstruct the hierarchy, assigning ids from `ids`
pub fn extract_toc(
    document: &dyn PdfDocument,
    file_name: &str,
    rules: &HeadingRules,
    ids: &mut dyn IdGenerator,
) -> Result<Extraction, BackendError> {
    let outline = document.outline()?;

    let (origin, entries) = if outline.is_empty() {
        (TocOrigin::Headings, infer_from_source(document, rules)?)
    } else {
        (TocOrigin::Outline, outline)
    };

    tracing::debug!(
        file_name,
        ?origin,
        entries = entries.len(),
        "TOC entries collected"
    );

    Ok(Extraction {
        origin,
        tree: build_hierarchy(entries, file_name, ids),
    })
}

/// Open `path` with `backend` and extract its TOC. Node file names are the
/// final path component.
pub fn extract_file(
    backend: &dyn PdfBackend,
    path: &Path,
    rules: &HeadingRules,
    ids: &mut dyn IdGenerator,
) -> Result<Extraction, BackendError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = backend.open(path)?;
    extract_toc(document.as_ref(), &file_name, rules, ids)
}
