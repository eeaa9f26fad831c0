use std::sync::Arc;

use tocshelf_core::{DocumentLibrary, HeadingRules, PdfBackend};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub library: DocumentLibrary,
    pub backend: Arc<dyn PdfBackend>,
    pub rules: HeadingRules,
}
