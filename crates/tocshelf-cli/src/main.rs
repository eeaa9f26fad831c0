use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use tocshelf_core::{
    DocumentLibrary, JsonFileStore, Settings, TocEntry, TocNode, UuidGenerator,
};

mod output;

use output::ColorMode;

/// Extract tables of contents from PDFs and manage the document library
#[derive(Parser, Debug)]
#[command(name = "tocshelf", version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the TOC of a PDF and print it as JSON
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Print flat (level, title, page) entries instead of linked nodes
        #[arg(long)]
        flat: bool,
    },

    /// List documents in the library
    List {
        /// Print the raw document records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a document's display title
    Rename {
        /// Stored file name of the document
        filename: String,
        /// New title
        title: String,
    },

    /// Remove a document and its stored upload
    Delete {
        /// Stored file name of the document
        filename: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load();
    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Extract { file_path, flat } => extract(&file_path, flat, &settings, color),
        Command::List { json } => list(&settings, json, color),
        Command::Rename { filename, title } => {
            let record = library(&settings).rename(&filename, &title)?;
            output::print_done(
                &mut std::io::stdout(),
                &format!("Renamed {} to '{}'", record.filename, record.title),
                color,
            )?;
            Ok(())
        }
        Command::Delete { filename } => {
            let outcome = library(&settings).delete(&filename)?;
            let message = if outcome.file_removed {
                format!("Deleted {} and its stored file", outcome.record.filename)
            } else {
                format!("Deleted {}", outcome.record.filename)
            };
            output::print_done(&mut std::io::stdout(), &message, color)?;
            Ok(())
        }
    }
}

fn library(settings: &Settings) -> DocumentLibrary {
    DocumentLibrary::new(
        Box::new(JsonFileStore::new(&settings.documents_file)),
        &settings.upload_dir,
    )
}

fn extract(
    file_path: &Path,
    flat: bool,
    settings: &Settings,
    color: ColorMode,
) -> anyhow::Result<()> {
    let extraction =
        tocshelf_ingest::extract_toc(file_path, &settings.heading_rules, &mut UuidGenerator)
            .with_context(|| format!("failed to extract TOC from {}", file_path.display()))?;

    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    output::print_origin(
        &mut std::io::stderr(),
        &file_name,
        extraction.origin,
        extraction.tree.len(),
        color,
    )?;

    let nodes = extraction.into_nodes();
    let json = if flat {
        let entries: Vec<TocEntry> = nodes.iter().map(TocNode::to_entry).collect();
        serde_json::to_string_pretty(&entries)?
    } else {
        serde_json::to_string_pretty(&nodes)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn list(settings: &Settings, json: bool, color: ColorMode) -> anyhow::Result<()> {
    let documents = library(settings).list()?;
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&documents)?)?;
    } else {
        output::print_documents(&mut stdout, &documents, color)?;
    }
    Ok(())
}
