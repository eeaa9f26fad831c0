use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use tocshelf_core::{DocumentRecord, nest_nodes};

use crate::error::ApiError;
use crate::models::{MessageResponse, RenameRequest, TreeResponse};
use crate::state::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    Ok(Json(state.library.list()?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<DocumentRecord>, ApiError> {
    Ok(Json(state.library.get(&filename)?))
}

pub async fn tree(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<TreeResponse>, ApiError> {
    let record = state.library.get(&filename)?;
    Ok(Json(TreeResponse {
        children: nest_nodes(&record.toc),
        name: record.title,
    }))
}

pub async fn rename(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let title = req
        .title
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let record = state.library.rename(&filename, &title)?;
    Ok(Json(MessageResponse::new(format!(
        "Document renamed to '{}'",
        record.title
    ))))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state.library.delete(&filename)?;
    Ok(Json(MessageResponse::new(format!(
        "Document '{}' deleted",
        outcome.record.filename
    ))))
}
