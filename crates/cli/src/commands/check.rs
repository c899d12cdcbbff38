//! Check a products file.

use std::path::Path;

use banket_core::{CatalogPayload, UNCATEGORIZED, UNTITLED, organize};
use banket_storefront::config::CatalogConfig;
use tracing::{info, warn};

/// Parse a products file with the storefront's acceptance rule and log the
/// organized buckets with their sizes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a product list.
pub async fn products_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let order = CatalogConfig::from_env()?.category_order;
    let content = tokio::fs::read_to_string(path).await?;
    let products = CatalogPayload::parse(&content)
        .map_err(|e| format!("{} is not a product list: {e}", path.display()))?;

    info!(path = %path.display(), products = products.len(), "Parsed products file");

    let untitled = products
        .iter()
        .filter(|product| product.display_title() == UNTITLED)
        .count();
    if untitled > 0 {
        warn!(count = untitled, "Products without a title");
    }

    for bucket in organize(&products, &order) {
        let configured = order.contains(bucket.name);
        info!(
            category = bucket.name,
            count = bucket.len(),
            configured,
            anchor = %bucket.anchor(),
            "Bucket"
        );
        if !configured && bucket.name != UNCATEGORIZED {
            warn!(category = bucket.name, "Category is not in the configured order");
        }
    }
    Ok(())
}
