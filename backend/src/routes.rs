use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Calendar routes
        .route("/calendars", get(handlers::list_calendars))
        .route("/calendars/all", get(handlers::get_all_calendars))
        .route("/calendar/:id", get(handlers::get_calendar))
}

/// Health check plus the `/api` tree, with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
