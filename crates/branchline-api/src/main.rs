//! Branchline API server entry point.

use std::error::Error;
use std::sync::Arc;

use branchline_api::build_router;
use branchline_api::config::{AppConfig, ContentSource};
use branchline_api::state::AppState;
use branchline_content::file_loader::FileContentLoader;
use branchline_content::http_loader::HttpContentLoader;
use branchline_core::content::ContentLoader;
use branchline_narrative::application::session::NarrativeSession;
use branchline_progress::file_store::FileProgressStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Branchline API server");

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;

    let loader: Arc<dyn ContentLoader> = match &config.content {
        ContentSource::Url(url) => Arc::new(HttpContentLoader::new(url.clone())),
        ContentSource::File(path) => Arc::new(FileContentLoader::new(path.clone())),
    };
    let store = Arc::new(FileProgressStore::new(config.progress_path.clone()));

    // A failed start is kept in the session; story routes answer 503 until
    // the process is restarted.
    let mut session = NarrativeSession::new(loader, store);
    if let Err(e) = session.start().await {
        tracing::error!(error = %e, "story unavailable; serving without a playable story");
    }

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = build_router(AppState::new(session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
