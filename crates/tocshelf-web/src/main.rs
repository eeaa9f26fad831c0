use std::sync::Arc;

mod app;
mod error;
mod handlers;
mod models;
mod state;
mod upload;

use state::AppState;
use tocshelf_core::{DocumentLibrary, JsonFileStore, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load();

    std::fs::create_dir_all(&settings.upload_dir)?;
    tracing::info!(
        upload_dir = %settings.upload_dir.display(),
        documents_file = %settings.documents_file.display(),
        "document library ready"
    );

    let library = DocumentLibrary::new(
        Box::new(JsonFileStore::new(&settings.documents_file)),
        &settings.upload_dir,
    );
    let state = Arc::new(AppState {
        library,
        backend: tocshelf_ingest::default_backend(),
        rules: settings.heading_rules.clone(),
    });

    let app = app::router(state, settings.body_limit_bytes());

    let addr = format!("{}:{}", settings.bind, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
