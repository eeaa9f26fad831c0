use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TocNode;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid document list: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored document: one uploaded PDF and its extracted TOC.
///
/// `toc` holds every node of the extraction (roots and descendants) in
/// creation order, with parent/child links intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub toc: Vec<TocNode>,
}

impl DocumentRecord {
    /// A new record titled after the file name without its extension.
    pub fn new(filename: impl Into<String>, toc: Vec<TocNode>) -> Self {
        let filename = filename.into();
        let title = Path::new(&filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());
        Self {
            filename,
            title,
            toc,
        }
    }
}

/// Whole-list persistence for document records.
///
/// Stores have no locking of their own; callers serialize load/modify/save
/// sequences (see [`crate::library::DocumentLibrary`]).
pub trait DocumentStore: Send + Sync {
    fn load(&self) -> Result<Vec<DocumentRecord>, StoreError>;
    fn save(&self, records: &[DocumentRecord]) -> Result<(), StoreError>;
}

/// A JSON array on disk, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    /// A missing file is an empty list.
    fn load(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, records: &[DocumentRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(records)?;
        content.push('\n');

        // Readers never observe a partially written list.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// An in-memory store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<DocumentRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<DocumentRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, records: &[DocumentRecord]) -> Result<(), StoreError> {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> TocNode {
        TocNode {
            id: id.into(),
            level: if parent.is_some() { 2 } else { 1 },
            title: format!("Title {id}"),
            page: 1,
            file_name: "paper.pdf".into(),
            parent_id: parent.map(str::to_string),
            child_ids: Vec::new(),
        }
    }

    #[test]
    fn title_defaults_to_file_stem() {
        let record = DocumentRecord::new("Annual Report 2024.pdf", Vec::new());
        assert_eq!(record.title, "Annual Report 2024");
        assert_eq!(record.filename, "Annual Report 2024.pdf");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("documents.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("documents.json"));
        let mut root = node("a", None);
        root.child_ids.push("b".into());
        let records = vec![
            DocumentRecord::new("paper.pdf", vec![root, node("b", Some("a"))]),
            DocumentRecord::new("notes.pdf", Vec::new()),
        ];

        store.save(&records).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, records);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn saved_file_is_indented_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("documents.json"));
        store
            .save(&[DocumentRecord::new("보고서.pdf", Vec::new())])
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  {\n"));
        assert!(raw.contains("\"title\": \"보고서\""));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn records_without_toc_field_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(&path, r#"[{"filename": "a.pdf", "title": "A"}]"#).unwrap();
        let loaded = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].toc.is_empty());
    }
}
