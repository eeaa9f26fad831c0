use std::io::Write;

use owo_colors::OwoColorize;
use tocshelf_core::{DocumentRecord, TocOrigin};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One line per document: file name, title, and how many TOC entries it has.
pub fn print_documents(
    w: &mut dyn Write,
    documents: &[DocumentRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    if documents.is_empty() {
        writeln!(w, "No documents.")?;
        return Ok(());
    }

    for doc in documents {
        let roots = doc.toc.iter().filter(|node| node.is_root()).count();
        let counts = format!("({} entries, {} top-level)", doc.toc.len(), roots);
        if color.enabled() {
            writeln!(
                w,
                "{}  {}  {}",
                doc.filename.bold(),
                doc.title.cyan(),
                counts.dimmed()
            )?;
        } else {
            writeln!(w, "{}  {}  {}", doc.filename, doc.title, counts)?;
        }
    }
    writeln!(w)?;
    writeln!(w, "{} document(s)", documents.len())?;
    Ok(())
}

/// Note on stderr where the extracted entries came from.
pub fn print_origin(
    w: &mut dyn Write,
    file_name: &str,
    origin: TocOrigin,
    entries: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let source = match origin {
        TocOrigin::Outline => "embedded outline",
        TocOrigin::Headings => "font-size headings",
    };
    let line = format!("{file_name}: {entries} entries from {source}");
    if color.enabled() {
        match origin {
            TocOrigin::Outline => writeln!(w, "{}", line.green())?,
            TocOrigin::Headings => writeln!(w, "{}", line.yellow())?,
        }
    } else {
        writeln!(w, "{line}")?;
    }
    Ok(())
}

/// A one-line confirmation for library mutations.
pub fn print_done(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "✓".green(), message)
    } else {
        writeln!(w, "{message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tocshelf_core::{SequentialIds, TocEntry, build_hierarchy};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_library_says_so() {
        let out = render(|w| print_documents(w, &[], ColorMode(false)));
        assert_eq!(out, "No documents.\n");
    }

    #[test]
    fn documents_list_counts_entries_and_roots() {
        let toc = build_hierarchy(
            vec![
                TocEntry::new(1, "Intro", 1),
                TocEntry::new(2, "Scope", 1),
                TocEntry::new(1, "Usage", 3),
            ],
            "guide.pdf",
            &mut SequentialIds::default(),
        )
        .into_nodes();
        let docs = vec![DocumentRecord::new("guide.pdf", toc)];

        let out = render(|w| print_documents(w, &docs, ColorMode(false)));
        assert!(out.starts_with("guide.pdf  guide  (3 entries, 2 top-level)\n"));
        assert!(out.ends_with("1 document(s)\n"));
    }

    #[test]
    fn origin_names_the_source() {
        let out = render(|w| print_origin(w, "a.pdf", TocOrigin::Headings, 4, ColorMode(false)));
        assert_eq!(out, "a.pdf: 4 entries from font-size headings\n");
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let out = render(|w| print_done(w, "Deleted a.pdf", ColorMode(false)));
        assert_eq!(out, "Deleted a.pdf\n");
    }
}
