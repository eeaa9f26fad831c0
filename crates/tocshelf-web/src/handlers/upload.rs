use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};

use tocshelf_core::{Extraction, TocNode, UuidGenerator};
use tocshelf_ingest::IngestError;

use crate::error::ApiError;
use crate::models::UploadResponse;
use crate::state::AppState;
use crate::upload;

/// Store the upload, extract its TOC and register it.
///
/// A duplicate file name still gets the fresh TOC back; only the stored
/// record is left as it was.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = upload::parse_multipart(multipart).await?;
    let filename = file.filename;

    // The file is written before parsing and stays even if parsing fails.
    let path = state.library.store_upload(&filename, &file.data)?;

    let extraction = extract_blocking(&state, path).await?.map_err(|e| {
        tracing::warn!(filename = %filename, error = %e, "Error processing PDF");
        ApiError::Processing
    })?;

    let nodes: Vec<TocNode> = extraction.into_nodes();
    let toc = nodes.iter().map(TocNode::to_entry).collect();
    state.library.register(&filename, nodes)?;

    Ok(Json(UploadResponse { filename, toc }))
}

/// Run the extraction on the blocking pool (MuPDF is synchronous).
async fn extract_blocking(
    state: &AppState,
    path: PathBuf,
) -> Result<Result<Extraction, IngestError>, ApiError> {
    let backend = Arc::clone(&state.backend);
    let rules = state.rules.clone();
    tokio::task::spawn_blocking(move || {
        tocshelf_ingest::extract_toc_with(backend.as_ref(), &path, &rules, &mut UuidGenerator)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))
}
