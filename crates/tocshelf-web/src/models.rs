use serde::{Deserialize, Serialize};

use tocshelf_core::{OutlineTreeNode, TocEntry};

/// Response to `POST /api/upload`: the freshly extracted TOC, flat.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub toc: Vec<TocEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Nested outline of one document, named by its display title.
#[derive(Debug, Serialize)]
pub struct TreeResponse {
    pub name: String,
    pub children: Vec<OutlineTreeNode>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
