//! Catalog page view model and templates.
//!
//! [`build_view`] is pure: load state plus filter in, [`CatalogView`] out.
//! Templates only read the view.

use askama::Template;
use askama_web::WebTemplate;
use banket_core::{
    CategoryOrder, CategorySelection, EscapedText, FilterState, ProductRecord, organize, visible,
};
use url::form_urlencoded;

use super::card::{CardContext, CardView};
use super::controller::{CatalogPhase, LoadState};
use crate::config::CatalogConfig;

/// Full catalog page.
pub const PAGE_PATH: &str = "/produkte";
/// `catalog-body` fragment for HTMX swaps.
pub const GRID_PATH: &str = "/produkte/grid";
/// Query value that hides the advisory banner.
pub const DISMISS_ADVISORY: &str = "hinweis";

pub const LOADING_MESSAGE: &str = "Produkte werden geladen…";
pub const ERROR_MESSAGE: &str =
    "Produkte konnten nicht geladen werden. Bitte versuchen Sie es später erneut.";
pub const EMPTY_MESSAGE: &str = "Keine Produkte in dieser Kategorie verfügbar.";
pub const ALL_PRODUCTS_LABEL: &str = "Alle Produkte";

/// Optional page controls. The product container is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogMounts {
    pub category_filter: bool,
    pub search_input: bool,
}

impl Default for CatalogMounts {
    fn default() -> Self {
        Self {
            category_filter: true,
            search_input: true,
        }
    }
}

/// Everything rendering needs besides the data and the filter.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub order: CategoryOrder,
    pub card: CardContext,
    pub mounts: CatalogMounts,
}

impl From<&CatalogConfig> for ViewSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            order: config.category_order.clone(),
            card: config.card.clone(),
            mounts: config.mounts,
        }
    }
}

/// One category control with its link targets.
#[derive(Debug, Clone)]
pub struct FilterControl {
    pub label: EscapedText,
    pub value: EscapedText,
    /// Member count over the whole dataset; `None` for the "all" control
    pub count: Option<usize>,
    pub href: EscapedText,
    pub fragment_href: EscapedText,
    pub active: bool,
}

/// One rendered category bucket.
#[derive(Debug, Clone)]
pub struct CatalogSection {
    pub name: EscapedText,
    pub anchor: String,
    pub cards: Vec<CardView>,
}

/// Render-ready catalog.
#[derive(Debug, Clone)]
pub struct CatalogView {
    pub phase: CatalogPhase,
    /// Current search text, escaped for the input's value attribute
    pub query: EscapedText,
    pub dismissed: bool,
    pub controls: Vec<FilterControl>,
    pub sections: Vec<CatalogSection>,
    pub advisory: Option<EscapedText>,
    pub dismiss_href: EscapedText,
    /// Loading, empty, or error text
    pub message: Option<&'static str>,
    /// Re-poll target while loading
    pub poll_href: EscapedText,
    pub mounts: CatalogMounts,
}

impl CatalogView {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.phase, CatalogPhase::Failed)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, CatalogPhase::Loading)
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|section| section.cards.len()).sum()
    }
}

/// Build the view for one request.
#[must_use]
pub fn build_view(
    state: &LoadState,
    filter: &FilterState,
    dismissed: bool,
    settings: &ViewSettings,
) -> CatalogView {
    let mut view = CatalogView {
        phase: CatalogPhase::Loading,
        query: EscapedText::new(&filter.query),
        dismissed,
        controls: Vec::new(),
        sections: Vec::new(),
        advisory: None,
        dismiss_href: catalog_href(PAGE_PATH, filter, true),
        message: None,
        poll_href: catalog_href(GRID_PATH, filter, dismissed),
        mounts: settings.mounts,
    };

    let (products, advisory) = match state {
        LoadState::Loading => {
            view.message = Some(LOADING_MESSAGE);
            return view;
        }
        LoadState::Failed => {
            view.phase = CatalogPhase::Failed;
            view.message = Some(ERROR_MESSAGE);
            return view;
        }
        LoadState::Ready { products, advisory } => (products, advisory),
    };

    if !dismissed {
        view.advisory = advisory
            .as_ref()
            .map(|advisory| EscapedText::new(&advisory.message));
    }

    if products.is_empty() {
        view.phase = CatalogPhase::Empty;
        view.message = Some(EMPTY_MESSAGE);
        return view;
    }

    if settings.mounts.category_filter {
        view.controls = filter_controls(products, filter, dismissed, &settings.order);
    }

    let shown = visible(products, filter);
    view.sections = organize(shown, &settings.order)
        .into_iter()
        .map(|bucket| CatalogSection {
            name: EscapedText::new(bucket.name),
            anchor: bucket.anchor(),
            cards: bucket
                .products
                .iter()
                .map(|product| CardView::build(product, &settings.card))
                .collect(),
        })
        .collect();

    view.phase = if view.sections.is_empty() {
        view.message = Some(EMPTY_MESSAGE);
        CatalogPhase::Empty
    } else if advisory.is_some() {
        CatalogPhase::LoadedWithAdvisory
    } else {
        CatalogPhase::Loaded
    };
    view
}

/// "All" plus one control per non-empty bucket, counted over the full dataset.
fn filter_controls(
    products: &[ProductRecord],
    filter: &FilterState,
    dismissed: bool,
    order: &CategoryOrder,
) -> Vec<FilterControl> {
    let buckets = organize(products, order);
    let mut controls = Vec::with_capacity(buckets.len() + 1);
    controls.push(control(
        ALL_PRODUCTS_LABEL,
        CategorySelection::All,
        None,
        filter,
        dismissed,
    ));
    for bucket in &buckets {
        controls.push(control(
            bucket.name,
            CategorySelection::Only(bucket.name.to_string()),
            Some(bucket.len()),
            filter,
            dismissed,
        ));
    }
    controls
}

fn control(
    label: &str,
    selection: CategorySelection,
    count: Option<usize>,
    filter: &FilterState,
    dismissed: bool,
) -> FilterControl {
    let active = selection == filter.category;
    let value = EscapedText::new(selection.as_str());
    let mut next = filter.clone();
    next.select_category(selection);

    FilterControl {
        label: EscapedText::new(label),
        value,
        count,
        href: catalog_href(PAGE_PATH, &next, dismissed),
        fragment_href: catalog_href(GRID_PATH, &next, dismissed),
        active,
    }
}

/// Link to `path` carrying the filter and the dismissal flag.
fn catalog_href(path: &str, filter: &FilterState, dismissed: bool) -> EscapedText {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !filter.category.is_all() {
        query.append_pair("category", filter.category.as_str());
    }
    let text = filter.query.trim();
    if !text.is_empty() {
        query.append_pair("q", text);
    }
    if dismissed {
        query.append_pair("dismiss", DISMISS_ADVISORY);
    }
    let query = query.finish();

    if query.is_empty() {
        EscapedText::new(path)
    } else {
        EscapedText::new(&format!("{path}?{query}"))
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full catalog page.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogPageTemplate {
    pub view: CatalogView,
}

/// `catalog-body` fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_body.html")]
pub struct CatalogBodyTemplate {
    pub view: CatalogView,
}
