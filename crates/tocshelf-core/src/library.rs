use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::store::{DocumentRecord, DocumentStore};
use crate::{CoreError, TocNode};

/// Whether `register` stored a new record or found the filename taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Added,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub record: DocumentRecord,
    /// Whether a stored upload was found and removed.
    pub file_removed: bool,
}

/// `true` if `filename` names a PDF upload (case-sensitive `.pdf` suffix).
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.ends_with(".pdf")
}

/// The document list plus the directory holding the uploaded files.
///
/// Every mutation is a load/modify/save of the whole list, done while
/// holding `write_lock`; this is the single writer for the store.
pub struct DocumentLibrary {
    store: Box<dyn DocumentStore>,
    upload_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentLibrary {
    pub fn new(store: Box<dyn DocumentStore>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Path an upload named `filename` is stored under.
    ///
    /// Rejects empty names and names that would escape the upload
    /// directory.
    pub fn upload_path(&self, filename: &str) -> Result<PathBuf, CoreError> {
        validate_filename(filename)?;
        Ok(self.upload_dir.join(filename))
    }

    /// Write uploaded bytes, replacing any earlier file of the same name.
    pub fn store_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf, CoreError> {
        let path = self.upload_path(filename)?;
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::write(&path, data)?;
        Ok(path)
    }

    pub fn list(&self) -> Result<Vec<DocumentRecord>, CoreError> {
        Ok(self.store.load()?)
    }

    pub fn get(&self, filename: &str) -> Result<DocumentRecord, CoreError> {
        self.store
            .load()?
            .into_iter()
            .find(|doc| doc.filename == filename)
            .ok_or_else(|| CoreError::NotFound(filename.to_string()))
    }

    /// Add a record for `filename` unless one already exists.
    ///
    /// Duplicates are detected by exact filename only; the existing record
    /// is left untouched.
    pub fn register(&self, filename: &str, toc: Vec<TocNode>) -> Result<UploadOutcome, CoreError> {
        let _guard = self.lock();
        let mut documents = self.store.load()?;

        if documents.iter().any(|doc| doc.filename == filename) {
            tracing::info!(filename, "Duplicate document upload ignored");
            return Ok(UploadOutcome::Duplicate);
        }

        documents.push(DocumentRecord::new(filename, toc));
        self.store.save(&documents)?;
        tracing::info!(filename, "Added new document");
        Ok(UploadOutcome::Added)
    }

    /// Change the display title of a document. The title is trimmed and
    /// must not be blank.
    pub fn rename(&self, filename: &str, title: &str) -> Result<DocumentRecord, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("Title is required".to_string()));
        }

        let _guard = self.lock();
        let mut documents = self.store.load()?;
        let doc = documents
            .iter_mut()
            .find(|doc| doc.filename == filename)
            .ok_or_else(|| CoreError::NotFound(filename.to_string()))?;
        doc.title = title.to_string();
        let updated = doc.clone();

        self.store.save(&documents)?;
        tracing::info!(filename, title, "Renamed document");
        Ok(updated)
    }

    /// Remove the record for `filename` and its stored upload, if any.
    pub fn delete(&self, filename: &str) -> Result<DeleteOutcome, CoreError> {
        let _guard = self.lock();
        let mut documents = self.store.load()?;
        let position = documents
            .iter()
            .position(|doc| doc.filename == filename)
            .ok_or_else(|| CoreError::NotFound(filename.to_string()))?;
        let record = documents.remove(position);
        self.store.save(&documents)?;

        let file_removed = match validate_filename(filename) {
            Ok(()) => remove_if_present(&self.upload_dir.join(filename))?,
            // A record whose name could not have come from an upload has
            // no file to remove.
            Err(_) => false,
        };

        tracing::info!(filename, file_removed, "Deleted document");
        Ok(DeleteOutcome {
            record,
            file_removed,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_filename(filename: &str) -> Result<(), CoreError> {
    if filename.is_empty() {
        return Err(CoreError::InvalidInput("No selected file".to_string()));
    }
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(CoreError::InvalidInput(format!(
            "Invalid file name: {filename}"
        )));
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<bool, std::io::Error> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
