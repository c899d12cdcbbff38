//! Catalog route handlers.
//!
//! Both handlers render from the controller's snapshot; neither fetches.
//! `grid` returns the `catalog-body` fragment that HTMX swaps in place.

use axum::extract::{Query, State};
use banket_core::{CategorySelection, FilterState};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CatalogBodyTemplate, CatalogPageTemplate, DISMISS_ADVISORY};
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Selected category, `all` or absent for everything
    #[serde(default)]
    pub category: Option<String>,
    /// Search text
    #[serde(default)]
    pub q: Option<String>,
    /// `hinweis` hides the advisory banner
    #[serde(default)]
    pub dismiss: Option<String>,
}

impl CatalogQuery {
    /// Filter for this request. A category and a query in the same URL combine.
    #[must_use]
    pub fn filter(&self) -> FilterState {
        FilterState::new(
            CategorySelection::parse(self.category.as_deref()),
            self.q.clone().unwrap_or_default(),
        )
    }

    #[must_use]
    pub fn dismissed(&self) -> bool {
        self.dismiss.as_deref().map(str::trim) == Some(DISMISS_ADVISORY)
    }
}

/// Full catalog page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> CatalogPageTemplate {
    let filter = query.filter();
    track_filter(&filter);

    CatalogPageTemplate {
        view: state.catalog().view(&filter, query.dismissed()),
    }
}

/// `catalog-body` fragment (HTMX).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> CatalogBodyTemplate {
    let filter = query.filter();
    track_filter(&filter);

    CatalogBodyTemplate {
        view: state.catalog().view(&filter, query.dismissed()),
    }
}

fn track_filter(filter: &FilterState) {
    if filter.is_unfiltered() {
        return;
    }
    add_breadcrumb(
        "catalog",
        "Filtered catalog",
        Some(&[
            ("category", filter.category.as_str()),
            ("query", filter.query.trim()),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = CatalogQuery {
            category: Some("Mietmöbel".to_string()),
            q: Some("tisch".to_string()),
            dismiss: None,
        };
        let filter = query.filter();
        assert_eq!(
            filter.category,
            CategorySelection::Only("Mietmöbel".to_string())
        );
        assert_eq!(filter.query, "tisch");
        assert!(!query.dismissed());
    }

    #[test]
    fn test_empty_query_is_unfiltered() {
        let query = CatalogQuery {
            category: Some("all".to_string()),
            ..CatalogQuery::default()
        };
        assert!(query.filter().is_unfiltered());
    }

    #[test]
    fn test_dismissed() {
        let query = CatalogQuery {
            dismiss: Some("hinweis".to_string()),
            ..CatalogQuery::default()
        };
        assert!(query.dismissed());

        let query = CatalogQuery {
            dismiss: Some("1".to_string()),
            ..CatalogQuery::default()
        };
        assert!(!query.dismissed());
    }
}
