//! Render the catalog page to a static file.

use std::path::Path;

use askama::Template;
use banket_core::{CategorySelection, FilterState};
use banket_storefront::catalog::{
    CatalogController, CatalogPageTemplate, CatalogPhase, CatalogResolver,
};
use banket_storefront::config::CatalogConfig;
use tracing::{info, warn};

/// Load the catalog once and write the page for the given filter.
///
/// # Arguments
///
/// * `out` - Output HTML file; parent directories are created
/// * `category` - Category to show, everything when `None`
/// * `query` - Search text
///
/// # Errors
///
/// Returns an error if configuration is invalid, the page cannot be written,
/// or every catalog source failed. In the last case the error page is still
/// written.
pub async fn page(
    out: &Path,
    category: Option<&str>,
    query: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogConfig::from_env()?;
    let resolver = CatalogResolver::from_config(&config)?;
    let controller = CatalogController::from_config(&config);

    info!(sources = resolver.sources().len(), "Loading catalog");
    let phase = controller.activate(&resolver).await;

    let filter = FilterState::new(
        CategorySelection::parse(category),
        query.unwrap_or_default(),
    );
    let view = controller.view(&filter, false);
    let cards = view.card_count();
    let html = CatalogPageTemplate { view }.render()?;

    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(out, html).await?;
    info!(path = %out.display(), phase = %phase, cards, "Catalog page written");

    if phase == CatalogPhase::LoadedWithAdvisory {
        warn!("Catalog was rendered from the local fallback");
    }
    if phase == CatalogPhase::Failed {
        return Err("all catalog sources failed".into());
    }
    Ok(())
}
