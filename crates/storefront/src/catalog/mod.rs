//! Product catalog: source resolution, load state, and rendering.
//!
//! # Flow
//!
//! 1. [`CatalogResolver`] tries the remote API, then the local fallback
//! 2. [`CatalogController`] records the outcome once and serves snapshots
//! 3. [`build_view`] filters, groups, and maps records to [`CardView`]s
//!
//! Interaction never re-fetches. Each request re-runs step 3 on the
//! resolved dataset with its own [`banket_core::FilterState`].

mod card;
mod controller;
mod source;
mod view;

pub use card::{CardContext, CardView};
pub use controller::{CatalogController, CatalogPhase, LoadState};
pub use source::{
    Advisory, AttemptOutcome, CatalogResolver, CatalogSource, DEFAULT_TIMEOUT, FALLBACK_ADVISORY,
    FallbackLocation, ResolveError, Resolution, SourceAttempt, SourceError, SourceKind,
};
pub use view::{
    ALL_PRODUCTS_LABEL, CatalogBodyTemplate, CatalogMounts, CatalogPageTemplate, CatalogSection,
    CatalogView, DISMISS_ADVISORY, EMPTY_MESSAGE, ERROR_MESSAGE, FilterControl, GRID_PATH,
    LOADING_MESSAGE, PAGE_PATH, ViewSettings, build_view,
};
