// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::artwork_fetcher::ArtworkFetcher;
use crate::application::collage_service::{CollageService, TileAcquirer};
use crate::infrastructure::collage_renderer::CollageRenderer;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::glyphs::GlyphPainter;
use crate::infrastructure::lastfm_api_source::LastfmApiSource;
use crate::infrastructure::lastfm_library_source::LastfmLibrarySource;
use crate::infrastructure::reqwest_fetcher::ReqwestFetcher;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{collage, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Font is parsed once and shared read-only by every request
    let font_bytes = tokio::fs::read(&config.render.font_path)
        .await
        .with_context(|| format!("Failed to read font {}", config.render.font_path))?;
    let renderer = Arc::new(CollageRenderer::new(GlyphPainter::from_bytes(font_bytes)?));

    // One HTTP client shared by both sources and the artwork fetcher
    let http = Arc::new(ReqwestFetcher::new(&config.fetch.user_agent)?);

    let album_source = Arc::new(LastfmApiSource::new(
        http.clone(),
        config.lastfm.api_base_url.clone(),
        config.lastfm.api_key.clone(),
    ));
    let library_source = Arc::new(LastfmLibrarySource::new(
        http.clone(),
        config.lastfm.site_base_url.clone(),
    ));
    let artwork = ArtworkFetcher::new(http, config.fetch.max_concurrent_fetches);

    let collage_service = CollageService::new(
        TileAcquirer::new(album_source, library_source, artwork),
        renderer,
    );

    let state = Arc::new(AppState { collage_service });

    // Anything that is not an API route is served from the static directory
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/collage", get(collage).post(collage))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting lastfm-collage on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
