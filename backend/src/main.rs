mod config;
mod error;
mod fetcher;
mod handlers;
mod registry;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::fetcher::CalendarFetcher;
use crate::registry::SourceRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG can come from it
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Starting calendar proxy");

    let registry = SourceRegistry::load(&config.calendars_file).with_context(|| {
        format!(
            "Failed to load calendars from {}",
            config.calendars_file.display()
        )
    })?;
    if registry.is_empty() {
        tracing::warn!("No calendars configured in {}", config.calendars_file.display());
    }
    tracing::info!("Loaded {} calendar(s): {}", registry.len(), registry.names());

    let fetcher =
        CalendarFetcher::new(config.fetch_timeout).context("Failed to build HTTP client")?;
    match config.fetch_timeout {
        Some(timeout) => tracing::info!("Upstream fetch timeout: {:?}", timeout),
        None => tracing::info!("Upstream fetch timeout: none"),
    }

    let app = create_app(AppState::new(registry, fetcher), &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Calendar proxy running at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Calendar proxy stopped");
    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Router {
    let app = routes::app(state).layer(build_cors_layer(config.cors_allowed_origins.as_deref()));

    // Serve the client bundle if the directory exists
    if config.static_dir.is_dir() {
        tracing::info!("Serving static files from {}", config.static_dir.display());
        app.fallback_service(ServeDir::new(&config.static_dir))
    } else {
        tracing::info!(
            "Static directory not found at {}, serving API only",
            config.static_dir.display()
        );
        app
    }
}

/// Build CORS layer based on environment configuration.
///
/// If CORS_ALLOWED_ORIGINS is set, only those origins are allowed.
/// If not set, defaults to permissive CORS (for development only).
fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set or empty, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping...");
}
