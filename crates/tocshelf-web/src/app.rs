use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// All routes, with uploaded files served from the library's upload
/// directory under `/uploads`.
pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    let uploads = ServeDir::new(state.library.upload_dir());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/documents", get(handlers::documents::list))
        .route(
            "/api/documents/{filename}",
            get(handlers::documents::get)
                .put(handlers::documents::rename)
                .delete(handlers::documents::delete),
        )
        .route(
            "/api/documents/{filename}/tree",
            get(handlers::documents::tree),
        )
        .route("/api/upload", post(handlers::upload::upload))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
