//! Integration tests for the storefront router.
//!
//! Requests go through the real router with `oneshot`; the catalog is loaded
//! from mock servers or completed directly on the controller.

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use banket_core::ProductRecord;
use banket_integration_tests::{
    MockServer, Respond, TWO_PRODUCTS, card_count, catalog_config, get, section_count, send,
    storefront_config,
};
use banket_storefront::catalog::{
    CatalogMounts, CatalogPhase, CatalogResolver, CatalogSource, EMPTY_MESSAGE, ERROR_MESSAGE,
    FALLBACK_ADVISORY, FallbackLocation, LOADING_MESSAGE, Resolution, SourceKind,
};
use banket_storefront::config::CatalogConfig;
use banket_storefront::routes;
use banket_storefront::state::AppState;

const ORDER: &[&str] = &["Mietmöbel", "Zelte und Pavillons"];

fn state_with(catalog: CatalogConfig, resolver: CatalogResolver, contact: &MockServer) -> AppState {
    AppState::with_resolver(storefront_config(catalog, contact.url("submit")), resolver)
        .expect("state should build")
}

/// Router whose catalog was loaded from `fallback`.
async fn loaded_from(fallback: &MockServer, mut catalog: CatalogConfig) -> (Router, AppState) {
    let contact = MockServer::start(Respond::json("{}")).await;
    catalog.fallback = FallbackLocation::Url(fallback.url("products.json"));

    let resolver = CatalogResolver::from_config(&catalog).expect("resolver should build");
    let state = state_with(catalog, resolver, &contact);
    let phase = state
        .start_catalog_load()
        .await
        .expect("load task panicked");
    assert_eq!(phase, CatalogPhase::Loaded);

    (routes::app(state.clone()), state)
}

/// Router whose catalog was loaded from a mock fallback serving `products`.
async fn loaded_app(products: &str) -> (Router, AppState) {
    let fallback = MockServer::start(Respond::json(products)).await;
    loaded_from(&fallback, catalog_config(ORDER)).await
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("{needle} not found"))
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_unfiltered_page_groups_in_configured_order() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;
    let (status, html) = get(&app, "/produkte").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(section_count(&html), 2);
    assert_eq!(card_count(&html), 2);
    assert!(position(&html, "id=\"cat-mietmoebel\"") < position(&html, "id=\"cat-zelte-und-pavillons\""));
    assert!(html.contains("Alle Produkte"));
    assert!(html.contains("Mietmöbel (1)"));
}

#[tokio::test]
async fn test_category_filter() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;
    let (_, html) = get(&app, "/produkte?category=Mietm%C3%B6bel").await;

    assert_eq!(section_count(&html), 1);
    assert_eq!(card_count(&html), 1);
    assert!(html.contains("id=\"cat-mietmoebel\""));
    assert!(!html.contains("id=\"cat-zelte-und-pavillons\""));
}

#[tokio::test]
async fn test_search_fragment_any_case() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;

    for query in ["zelt", "ZELT", "%20Zelt%20"] {
        let (status, html) = get(&app, &format!("/produkte/grid?q={query}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.starts_with("<div id=\"catalog-body\""));
        assert_eq!(section_count(&html), 1, "query {query}");
        assert_eq!(card_count(&html), 1, "query {query}");
        assert!(html.contains("id=\"cat-zelte-und-pavillons\""));
    }
}

#[tokio::test]
async fn test_category_and_query_combine() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;
    let (_, html) = get(&app, "/produkte/grid?category=Mietm%C3%B6bel&q=zelt").await;

    assert_eq!(card_count(&html), 0);
    assert!(html.contains(EMPTY_MESSAGE));
    assert!(html.contains("filter-btn"), "controls stay visible");
}

#[tokio::test]
async fn test_product_text_is_escaped() {
    let (app, _) = loaded_app(r#"[{"title": "A & B <script>", "category": "Mietmöbel"}]"#).await;
    let (_, html) = get(&app, "/produkte/grid").await;

    assert!(html.contains("A &amp; B &lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn test_card_links() {
    let (app, _) = loaded_app(
        r#"[{"title": "Tisch", "slug": "tisch", "category": "Mietmöbel", "price": "10€", "topseller": true}]"#,
    )
    .await;
    let (_, html) = get(&app, "/produkte/grid").await;

    assert!(html.contains("href=\"https://wa.me/491727323405?text=Hallo%21%20Ich%20interessiere%20mich%20f%C3%BCr%3A%20Tisch%20%2810%E2%82%AC%29\""));
    assert!(html.contains("target=\"_blank\" rel=\"noopener noreferrer\""));
    assert!(html.contains("href=\"/tisch.html\""));
    assert!(html.contains("topseller-label"));
    assert!(html.contains("this.onerror=null;"));
}

#[tokio::test]
async fn test_interaction_never_refetches() {
    let fallback = MockServer::start(Respond::json(TWO_PRODUCTS)).await;
    let (app, _) = loaded_from(&fallback, catalog_config(ORDER)).await;
    assert_eq!(fallback.hits(), 1);

    for uri in [
        "/produkte",
        "/produkte/grid?category=Mietm%C3%B6bel",
        "/produkte/grid?q=zelt",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
    assert_eq!(fallback.hits(), 1, "catalog is fetched once per activation");
}

#[tokio::test]
async fn test_search_input_can_be_disabled() {
    let fallback = MockServer::start(Respond::json(TWO_PRODUCTS)).await;
    let mut catalog = catalog_config(ORDER);
    catalog.mounts = CatalogMounts {
        search_input: false,
        ..CatalogMounts::default()
    };
    let (app, _) = loaded_from(&fallback, catalog).await;

    let (_, html) = get(&app, "/produkte").await;
    assert!(!html.contains("product-search-input"));
    assert!(html.contains("filter-btn"), "category filter stays enabled");
    assert_eq!(card_count(&html), 2);
}

#[tokio::test]
async fn test_catalog_responses_are_not_cached() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;
    let request = Request::builder()
        .uri("/produkte")
        .body(Body::empty())
        .expect("Invalid request");
    let (_, headers, _) = send(&app, request).await;

    assert_eq!(
        headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
}

// =============================================================================
// Load states
// =============================================================================

#[tokio::test]
async fn test_loading_until_completed() {
    let contact = MockServer::start(Respond::json("{}")).await;
    let catalog = catalog_config(ORDER);
    let resolver = CatalogResolver::from_config(&catalog).expect("resolver should build");
    let state = state_with(catalog, resolver, &contact);
    let app = routes::app(state.clone());

    let (ready, _) = get(&app, "/health/ready").await;
    assert_eq!(ready, StatusCode::SERVICE_UNAVAILABLE);
    let (_, html) = get(&app, "/produkte").await;
    assert!(html.contains(LOADING_MESSAGE));
    assert!(html.contains("hx-trigger=\"load delay:1s\""));

    let products: Vec<ProductRecord> =
        serde_json::from_str(TWO_PRODUCTS).expect("valid products");
    state.catalog().complete(Ok(Resolution {
        products,
        source: SourceKind::LocalFallback,
        attempts: Vec::new(),
        advisory: None,
    }));

    let (ready, _) = get(&app, "/health/ready").await;
    assert_eq!(ready, StatusCode::OK);
    let (_, html) = get(&app, "/produkte").await;
    assert_eq!(card_count(&html), 2);
}

#[tokio::test]
async fn test_failed_load_shows_only_error() {
    let contact = MockServer::start(Respond::json("{}")).await;
    let mut catalog = catalog_config(ORDER);
    catalog.fallback = FallbackLocation::File(PathBuf::from("/nonexistent/products.json"));
    let resolver = CatalogResolver::from_config(&catalog).expect("resolver should build");
    let state = state_with(catalog, resolver, &contact);

    let phase = state.start_catalog_load().await.expect("load task panicked");
    assert_eq!(phase, CatalogPhase::Failed);

    let app = routes::app(state);
    let (status, html) = get(&app, "/produkte").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(ERROR_MESSAGE));
    assert!(!html.contains("filter-btn"));
    assert!(!html.contains("product-search-input"));
    assert_eq!(card_count(&html), 0);

    let (ready, _) = get(&app, "/health/ready").await;
    assert_eq!(ready, StatusCode::OK);
}

#[tokio::test]
async fn test_fallback_advisory_and_dismissal() {
    let remote = MockServer::start(Respond::Status(502)).await;
    let fallback = MockServer::start(Respond::json(TWO_PRODUCTS)).await;
    let contact = MockServer::start(Respond::json("{}")).await;
    let resolver = CatalogResolver::new(
        reqwest::Client::new(),
        vec![
            CatalogSource::RemoteApi {
                base: remote.base(),
            },
            CatalogSource::LocalFallback {
                location: FallbackLocation::Url(fallback.url("products.json")),
            },
        ],
    );
    let state = state_with(catalog_config(ORDER), resolver, &contact);

    let phase = state.start_catalog_load().await.expect("load task panicked");
    assert_eq!(phase, CatalogPhase::LoadedWithAdvisory);

    let app = routes::app(state);
    let (_, html) = get(&app, "/produkte").await;
    assert!(html.contains(FALLBACK_ADVISORY));
    assert!(html.contains("href=\"/produkte?dismiss=hinweis\""));
    assert_eq!(card_count(&html), 2);

    let (_, html) = get(&app, "/produkte?dismiss=hinweis").await;
    assert!(!html.contains(FALLBACK_ADVISORY));
    assert!(html.contains("name=\"dismiss\" value=\"hinweis\""));
}

#[tokio::test]
async fn test_empty_catalog() {
    let (app, state) = {
        let fallback = MockServer::start(Respond::json("[]")).await;
        let contact = MockServer::start(Respond::json("{}")).await;
        let mut catalog = catalog_config(ORDER);
        catalog.fallback = FallbackLocation::Url(fallback.url("products.json"));
        let resolver = CatalogResolver::from_config(&catalog).expect("resolver should build");
        let state = state_with(catalog, resolver, &contact);
        state.start_catalog_load().await.expect("load task panicked");
        (routes::app(state.clone()), state)
    };

    assert_eq!(state.catalog().phase(), CatalogPhase::Empty);
    let (_, html) = get(&app, "/produkte").await;
    assert!(html.contains(EMPTY_MESSAGE));
    assert!(!html.contains("filter-btn"));
}

// =============================================================================
// Health, static files, fallback
// =============================================================================

#[tokio::test]
async fn test_health_static_and_not_found() {
    let (app, _) = loaded_app(TWO_PRODUCTS).await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, body) = get(&app, "/static/images/placeholder.svg").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<svg"));

    let (status, body) = get(&app, "/nirgendwo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).expect("JSON error body");
    assert_eq!(json["success"], false);
}

// =============================================================================
// Contact form
// =============================================================================

fn contact_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/kontakt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Invalid request")
}

async fn contact_app(endpoint: &MockServer) -> Router {
    let catalog = catalog_config(ORDER);
    let resolver = CatalogResolver::from_config(&catalog).expect("resolver should build");
    routes::app(state_with(catalog, resolver, endpoint))
}

#[tokio::test]
async fn test_contact_validation_errors() {
    let endpoint = MockServer::start(Respond::json("{}")).await;
    let app = contact_app(&endpoint).await;

    let (status, _, body) = send(&app, contact_request(r#"{"name": "", "email": "anna@"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body).expect("JSON error body");
    assert_eq!(json["success"], false);
    assert_eq!(json["errors"]["name"], "Name is required");
    assert_eq!(json["errors"]["email"], "Email is invalid");
    assert_eq!(endpoint.hits(), 0);
}

#[tokio::test]
async fn test_contact_forwarded() {
    let endpoint = MockServer::start(Respond::json("{}")).await;
    let app = contact_app(&endpoint).await;

    let (status, _, body) = send(
        &app,
        contact_request(r#"{"name": "Anna", "email": "anna@example.de", "message": "Stehtische?"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).expect("JSON body");
    assert_eq!(json["success"], true);
    assert_eq!(endpoint.hits(), 1);

    let forwarded: serde_json::Value = serde_json::from_str(
        &endpoint.last_request().expect("request seen").body,
    )
    .expect("forwarded JSON");
    assert_eq!(forwarded["email"], "anna@example.de");
    assert_eq!(forwarded["message"], "Stehtische?");
}

#[tokio::test]
async fn test_contact_endpoint_failure() {
    let endpoint = MockServer::start(Respond::Status(500)).await;
    let app = contact_app(&endpoint).await;

    let (status, _, body) = send(
        &app,
        contact_request(r#"{"name": "Anna", "email": "anna@example.de"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_str(&body).expect("JSON error body");
    assert_eq!(json["success"], false);
    assert_eq!(endpoint.hits(), 1);
}
