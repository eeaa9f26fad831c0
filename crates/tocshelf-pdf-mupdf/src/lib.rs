use std::path::Path;

use mupdf::{Document, Outline, TextPageFlags};

use tocshelf_core::{
    BackendError, OutlineSource, PdfBackend, PdfDocument, SpanSource, TextLine, TextSpan,
    TocEntry,
};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the only one that links mupdf (AGPL-3.0); the TOC
/// pipeline and the web layer see it through the core traits.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        Ok(Box::new(MupdfDocument { document }))
    }
}

/// An opened MuPDF document.
pub struct MupdfDocument {
    document: Document,
}

impl SpanSource for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_lines(&self, page_index: usize) -> Result<Vec<TextLine>, BackendError> {
        let index = i32::try_from(page_index)
            .map_err(|_| BackendError::ExtractionError(format!("page {page_index} out of range")))?;
        let page = self
            .document
            .load_page(index)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        // Image blocks carry no lines and contribute nothing.
        let mut lines = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let chars = line
                    .chars()
                    .map(|c| (c.char().unwrap_or('\u{FFFD}'), c.size()));
                lines.push(TextLine::new(group_spans(chars)));
            }
        }
        Ok(lines)
    }
}

impl OutlineSource for MupdfDocument {
    fn outline(&self) -> Result<Vec<TocEntry>, BackendError> {
        let outlines = self
            .document
            .outlines()
            .map_err(|e| BackendError::OutlineError(e.to_string()))?;
        Ok(flatten_outline(&outlines))
    }
}

/// Split a line's characters into spans wherever the font size changes.
pub fn group_spans<I>(chars: I) -> Vec<TextSpan>
where
    I: IntoIterator<Item = (char, f32)>,
{
    let mut spans: Vec<TextSpan> = Vec::new();
    for (ch, size) in chars {
        match spans.last_mut() {
            Some(span) if (span.font_size - size).abs() <= f32::EPSILON => span.text.push(ch),
            _ => spans.push(TextSpan::new(ch.to_string(), size)),
        }
    }
    spans
}

/// Pre-order walk of the outline tree into `(level, title, page)` entries,
/// with roots at level 1.
///
/// Items without a resolvable destination inherit the page of the entry
/// before them (page 1 at the start).
fn flatten_outline(outlines: &[Outline]) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut last_page = 1;
    let mut stack: Vec<(u32, &Outline)> = outlines.iter().rev().map(|o| (1, o)).collect();

    while let Some((level, item)) = stack.pop() {
        let page = item
            .dest
            .as_ref()
            .map(|dest| dest.loc.page_number as u32 + 1)
            .unwrap_or(last_page);
        last_page = page;
        entries.push(TocEntry::new(level, item.title.trim(), page));

        stack.extend(item.down.iter().rev().map(|child| (level + 1, child)));
    }

    tracing::trace!(entries = entries.len(), "flattened outline");
    entries
}
