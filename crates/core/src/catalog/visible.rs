//! Visibility filter over the resolved product list.

use crate::types::{FilterState, ProductRecord};

/// Records passing both the category and the search predicate.
///
/// The result is a subsequence of `products` in input order. The search
/// predicate only applies when the query is non-blank after trimming.
#[must_use]
pub fn visible<'a>(products: &'a [ProductRecord], filter: &FilterState) -> Vec<&'a ProductRecord> {
    let needle = filter.normalized_query();
    products
        .iter()
        .filter(|product| filter.category.matches(product.category_name()))
        .filter(|product| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_query(product, needle))
        })
        .collect()
}

/// Case-insensitive substring match against title, summary line, and category.
///
/// Only values the record actually carries are searched; the placeholder
/// title and the sentinel category never match. `needle` must already be
/// trimmed and lowercased (see [`FilterState::normalized_query`]). Umlauts
/// are compared as-is.
#[must_use]
pub fn matches_query(product: &ProductRecord, needle: &str) -> bool {
    [
        product.title.as_deref(),
        product.summary(),
        product.category.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
