//! Application state shared across handlers.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::catalog::{CatalogController, CatalogPhase, CatalogResolver, SourceError};
use crate::config::StorefrontConfig;
use crate::services::{ContactClient, ContactError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Source(#[from] SourceError),
    #[error("contact client: {0}")]
    Contact(#[from] ContactError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the catalog controller, and outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogController,
    resolver: CatalogResolver,
    contact: ContactClient,
}

impl AppState {
    /// Create a new application state with sources taken from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let resolver = CatalogResolver::from_config(&config.catalog)?;
        Self::with_resolver(config, resolver)
    }

    /// Create a new application state with an explicit resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact client fails to build.
    pub fn with_resolver(
        config: StorefrontConfig,
        resolver: CatalogResolver,
    ) -> Result<Self, StateError> {
        let catalog = CatalogController::from_config(&config.catalog);
        let contact = ContactClient::new(&config.contact)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                resolver,
                contact,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog controller.
    #[must_use]
    pub fn catalog(&self) -> &CatalogController {
        &self.inner.catalog
    }

    /// Get a reference to the contact form client.
    #[must_use]
    pub fn contact(&self) -> &ContactClient {
        &self.inner.contact
    }

    /// Spawn the catalog load task.
    ///
    /// The app serves requests immediately; until the task finishes, catalog
    /// pages show the loading placeholder.
    pub fn start_catalog_load(&self) -> JoinHandle<CatalogPhase> {
        info!("Spawning catalog load task");
        let state = self.clone();
        tokio::spawn(async move {
            let phase = state.inner.catalog.activate(&state.inner.resolver).await;
            info!(phase = %phase, "Catalog load task finished");
            phase
        })
    }
}
