//! Catalog load state machine.
//!
//! The controller starts in `Loading` and leaves it exactly once, when the
//! load task reports a resolution. Request handlers only read: they take a
//! snapshot of the state and render it with their own filter.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use banket_core::{FilterState, ProductRecord};
use tracing::{info, instrument, warn};

use super::source::{Advisory, CatalogResolver, ResolveError, Resolution};
use super::view::{CatalogView, ViewSettings, build_view};
use crate::config::CatalogConfig;

/// Presentation phase of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPhase {
    Loading,
    Loaded,
    LoadedWithAdvisory,
    Empty,
    Failed,
}

impl CatalogPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::LoadedWithAdvisory => "loaded_with_advisory",
            Self::Empty => "empty",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CatalogPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved dataset, or why there is none.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready {
        products: Arc<[ProductRecord]>,
        advisory: Option<Advisory>,
    },
    Failed,
}

impl LoadState {
    #[must_use]
    pub fn phase(&self) -> CatalogPhase {
        match self {
            Self::Loading => CatalogPhase::Loading,
            Self::Failed => CatalogPhase::Failed,
            Self::Ready { products, .. } if products.is_empty() => CatalogPhase::Empty,
            Self::Ready {
                advisory: Some(_), ..
            } => CatalogPhase::LoadedWithAdvisory,
            Self::Ready { .. } => CatalogPhase::Loaded,
        }
    }
}

impl From<Result<Resolution, ResolveError>> for LoadState {
    fn from(result: Result<Resolution, ResolveError>) -> Self {
        match result {
            Ok(resolution) => Self::Ready {
                products: Arc::from(resolution.products),
                advisory: resolution.advisory,
            },
            Err(ResolveError::Exhausted { .. }) => Self::Failed,
        }
    }
}

/// Owner of the catalog load state.
///
/// Cheaply cloneable; all clones share one state.
#[derive(Debug, Clone)]
pub struct CatalogController {
    state: Arc<RwLock<LoadState>>,
    settings: Arc<ViewSettings>,
}

impl CatalogController {
    #[must_use]
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            state: Arc::new(RwLock::new(LoadState::Loading)),
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(ViewSettings::from(config))
    }

    /// Copy of the current state. The dataset is shared, not cloned.
    #[must_use]
    pub fn snapshot(&self) -> LoadState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn phase(&self) -> CatalogPhase {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .phase()
    }

    /// Whether the load has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase() != CatalogPhase::Loading
    }

    /// Leave `Loading` with the given result.
    ///
    /// Returns `false` and keeps the current state if the load already completed.
    pub fn complete(&self, result: Result<Resolution, ResolveError>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, LoadState::Loading) {
            warn!(phase = %state.phase(), "Ignoring second catalog completion");
            return false;
        }

        *state = LoadState::from(result);
        info!(phase = %state.phase(), "Catalog load completed");
        true
    }

    /// Run the resolver once and record the outcome.
    #[instrument(skip_all)]
    pub async fn activate(&self, resolver: &CatalogResolver) -> CatalogPhase {
        let result = resolver.resolve().await;
        self.complete(result);
        self.phase()
    }

    /// Render-ready view for one request.
    #[must_use]
    pub fn view(&self, filter: &FilterState, dismissed: bool) -> CatalogView {
        build_view(&self.snapshot(), filter, dismissed, &self.settings)
    }
}
