//! Font-size based heading detection for documents without an outline.
//!
//! Every admitted line becomes a level-1 entry: font metrics alone are not
//! reliable enough to guess depth, so the fallback produces a flat list.

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, SpanSource};
use crate::{PageSpans, TextLine, TocEntry};

/// Thresholds deciding whether a text line looks like a heading.
///
/// All bounds are exclusive: a line is admitted when its font size is
/// strictly greater than `min_font_size` and its trimmed character count
/// lies strictly between `min_title_chars` and `max_title_chars`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRules {
    pub min_font_size: f32,
    pub min_title_chars: usize,
    pub max_title_chars: usize,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            min_font_size: 12.0,
            min_title_chars: 5,
            max_title_chars: 100,
        }
    }
}

impl HeadingRules {
    /// The heading title for `line`, or `None` if the line is rejected.
    pub fn admit(&self, line: &TextLine) -> Option<String> {
        let font_size = line.font_size()?;
        if font_size <= self.min_font_size {
            return None;
        }
        let text = line.text();
        let chars = text.chars().count();
        if chars <= self.min_title_chars || chars >= self.max_title_chars {
            return None;
        }
        Some(text)
    }
}

/// Scan pre-extracted pages and emit heading candidates in scan order.
pub fn infer_headings(pages: &[PageSpans], rules: &HeadingRules) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    for (page_index, page) in pages.iter().enumerate() {
        scan_page(page_index, &page.lines, rules, &mut entries);
    }
    entries
}

/// Like [`infer_headings`], pulling one page at a time from `source`.
pub fn infer_from_source<S>(source: &S, rules: &HeadingRules) -> Result<Vec<TocEntry>, BackendError>
where
    S: SpanSource + ?Sized,
{
    let mut entries = Vec::new();
    for page_index in 0..source.page_count()? {
        let lines = source.page_lines(page_index)?;
        scan_page(page_index, &lines, rules, &mut entries);
    }
    Ok(entries)
}

fn scan_page(page_index: usize, lines: &[TextLine], rules: &HeadingRules, out: &mut Vec<TocEntry>) {
    let page = page_index as u32 + 1;
    out.extend(
        lines
            .iter()
            .filter_map(|line| rules.admit(line))
            .map(|title| TocEntry::new(1, title, page)),
    );
}
