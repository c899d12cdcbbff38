//! Integration test helpers for the BANKetTISCH catalog.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p banket-integration-tests
//! ```
//!
//! Every test runs in-process: mock catalog and form endpoints are axum
//! servers bound to `127.0.0.1:0`, and storefront requests go through
//! `tower::ServiceExt::oneshot` against the real router.
//!
//! # Test Categories
//!
//! - `catalog_sources` - Resolver precedence, timeouts, cache defeat
//! - `storefront_routes` - Rendered pages, fragments, health, contact form

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use banket_core::CategoryOrder;
use banket_storefront::config::{CatalogConfig, ContactConfig, StorefrontConfig};
use tower::ServiceExt;
use url::Url;

/// How a mock endpoint answers every request.
#[derive(Debug, Clone)]
pub enum Respond {
    /// 200 with this JSON body
    Json(String),
    /// Empty body with this status
    Status(u16),
    /// Never answers within any test budget
    Hang,
}

impl Respond {
    #[must_use]
    pub fn json(body: &str) -> Self {
        Self::Json(body.to_string())
    }
}

/// What a mock endpoint saw in its most recent request.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub cache_control: Option<String>,
    pub pragma: Option<String>,
    pub body: String,
}

struct MockState {
    respond: Respond,
    hits: AtomicUsize,
    last: Mutex<Option<SeenRequest>>,
}

/// An in-process HTTP endpoint that counts requests.
pub struct MockServer {
    base: Url,
    state: Arc<MockState>,
}

impl MockServer {
    /// Start a server answering every path with `respond`.
    pub async fn start(respond: Respond) -> Self {
        let state = Arc::new(MockState {
            respond,
            hits: AtomicUsize::new(0),
            last: Mutex::new(None),
        });

        let app = Router::new()
            .fallback(serve_mock)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        let base = Url::parse(&format!("http://{addr}/")).expect("Invalid mock URL");
        Self { base, state }
    }

    /// Base URL, ending in `/`.
    #[must_use]
    pub fn base(&self) -> Url {
        self.base.clone()
    }

    /// URL of `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base.join(path).expect("Invalid mock path")
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn last_request(&self) -> Option<SeenRequest> {
        self.state
            .last
            .lock()
            .expect("Mock state poisoned")
            .clone()
    }
}

async fn serve_mock(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let seen = SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        cache_control: header_text(header::CACHE_CONTROL),
        pragma: header_text(header::PRAGMA),
        body,
    };
    *state.last.lock().expect("Mock state poisoned") = Some(seen);

    match &state.respond {
        Respond::Json(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        Respond::Status(code) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Respond::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

/// Products used by the end-to-end rendering checks.
pub const TWO_PRODUCTS: &str = r#"[
    {"title": "Tisch", "category": "Mietmöbel", "price": "10€"},
    {"title": "Zelt", "category": "Zelte und Pavillons", "price": "50€"}
]"#;

/// Path to the storefront's static directory.
#[must_use]
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// Catalog configuration with the given category order and defaults otherwise.
#[must_use]
pub fn catalog_config(order: &[&str]) -> CatalogConfig {
    CatalogConfig {
        category_order: CategoryOrder::new(order.iter().copied()),
        timeout: Duration::from_secs(2),
        ..CatalogConfig::default()
    }
}

/// Storefront configuration for in-process tests.
#[must_use]
pub fn storefront_config(catalog: CatalogConfig, contact_endpoint: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("Invalid host"),
        port: 0,
        static_dir: static_dir(),
        catalog,
        contact: ContactConfig {
            endpoint: contact_endpoint,
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Send one request through `app` and return the status, headers, and body text.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8");
    (status, headers, body)
}

/// GET `uri` through `app`.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Invalid request");
    let (status, _, body) = send(app, request).await;
    (status, body)
}

/// Number of product cards in rendered HTML.
#[must_use]
pub fn card_count(html: &str) -> usize {
    html.matches("<article class=\"produkt product-card").count()
}

/// Number of category sections in rendered HTML.
#[must_use]
pub fn section_count(html: &str) -> usize {
    html.matches("<section class=\"category-section\"").count()
}
