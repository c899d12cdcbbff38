//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - 200 once the catalog load finished, 503 before
//!
//! # Catalog
//! GET  /produkte               - Catalog page (?category=, ?q=, ?dismiss=hinweis)
//! GET  /produkte/grid          - catalog-body fragment (HTMX)
//!
//! # Contact
//! POST /kontakt                - Contact form (JSON)
//!
//! # Assets
//! GET  /static/*               - Static files (fallback catalog, placeholder image)
//! ```

pub mod catalog;
pub mod contact;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, Uri, header},
    routing::{get, post},
};
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::catalog::{GRID_PATH, PAGE_PATH};
use crate::error::AppError;
use crate::state::AppState;

/// Create the catalog routes router.
///
/// Responses are marked `no-cache` so filter fragments are never reused.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(PAGE_PATH, get(catalog::index))
        .route(GRID_PATH, get(catalog::grid))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .route("/kontakt", post(contact::submit))
}

/// Build the full application: routes, health checks, static files, and tracing.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog load task has finished.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_settled() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
