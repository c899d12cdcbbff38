//! Catalog source resolution.
//!
//! Sources are tried in priority order (remote API, then local fallback)
//! until one yields a product list. Each attempt runs under its own timeout,
//! so a hung endpoint costs at most one budget before the next source runs.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use banket_core::{CatalogPayload, ProductRecord};
use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::config::CatalogConfig;

/// Budget for a single source attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Notice shown when only the local fallback could be loaded.
pub const FALLBACK_ADVISORY: &str =
    "Die Live-Daten konnten nicht geladen werden; es werden lokale Ergebnisse angezeigt.";

/// Errors from a single source attempt. Recovered by trying the next source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Source answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Attempt exceeded its budget.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Body is neither a product array nor an object with a `products` array.
    #[error("malformed catalog body: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Local file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configured base cannot carry a path.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Every configured source failed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("all catalog sources failed ({} attempts)", .attempts.len())]
    Exhausted { attempts: Vec<SourceAttempt> },
}

/// Which kind of source an attempt used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    RemoteApi,
    LocalFallback,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RemoteApi => "remote_api",
            Self::LocalFallback => "local_fallback",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the local fallback lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackLocation {
    /// Fetched over HTTP like the remote API.
    Url(Url),
    /// Read from disk.
    File(PathBuf),
}

impl FallbackLocation {
    /// `http://` and `https://` values are URLs; anything else is a path.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed http(s) URL.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        let value = value.trim();
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Url::parse(value).map(Self::Url)
        } else {
            Ok(Self::File(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for FallbackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One entry of the source priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// `GET {base}/products`
    RemoteApi { base: Url },
    LocalFallback { location: FallbackLocation },
}

impl CatalogSource {
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::RemoteApi { .. } => SourceKind::RemoteApi,
            Self::LocalFallback { .. } => SourceKind::LocalFallback,
        }
    }

    /// Fetch and parse this source once, without a timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport, status, read, or shape failures.
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<ProductRecord>, SourceError> {
        match self {
            Self::RemoteApi { base } => fetch_json(client, products_url(base)?).await,
            Self::LocalFallback {
                location: FallbackLocation::Url(url),
            } => fetch_json(client, url.clone()).await,
            Self::LocalFallback {
                location: FallbackLocation::File(path),
            } => {
                let body = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })?;
                CatalogPayload::parse(&body).map_err(SourceError::Malformed)
            }
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteApi { base } => write!(f, "{base}"),
            Self::LocalFallback { location } => write!(f, "{location}"),
        }
    }
}

/// Result of one source attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    SuccessWithData(usize),
    SuccessEmpty,
    Failed(String),
}

impl AttemptOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SuccessWithData(_) => "success_with_data",
            Self::SuccessEmpty => "success_empty",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Record of one attempt, kept for logging and the advisory decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub source: SourceKind,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

/// Non-blocking notice that the data did not come from the primary source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub message: String,
}

impl Advisory {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            message: FALLBACK_ADVISORY.to_string(),
        }
    }
}

/// A successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub products: Vec<ProductRecord>,
    /// Source that produced `products`
    pub source: SourceKind,
    /// All attempts in order, the last one successful
    pub attempts: Vec<SourceAttempt>,
    /// Set when an earlier source failed before this one succeeded
    pub advisory: Option<Advisory>,
}

/// Tries catalog sources in order until one succeeds.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    client: reqwest::Client,
    sources: Vec<CatalogSource>,
    timeout: Duration,
}

impl CatalogResolver {
    #[must_use]
    pub const fn new(client: reqwest::Client, sources: Vec<CatalogSource>) -> Self {
        Self {
            client,
            sources,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the source list from configuration: the remote API when a base
    /// is set, then the fallback.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("banket-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut sources = Vec::with_capacity(2);
        if let Some(base) = &config.api_base {
            sources.push(CatalogSource::RemoteApi { base: base.clone() });
        }
        sources.push(CatalogSource::LocalFallback {
            location: config.fallback.clone(),
        });

        Ok(Self::new(client, sources).with_timeout(config.timeout))
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn sources(&self) -> &[CatalogSource] {
        &self.sources
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the product list.
    ///
    /// Stops at the first source that answers with a valid body, even an
    /// empty one. An advisory is attached when an earlier source failed.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Exhausted` with every attempt when no source succeeds.
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn resolve(&self) -> Result<Resolution, ResolveError> {
        let mut attempts: Vec<SourceAttempt> = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let started = Instant::now();
            let result = tokio::time::timeout(self.timeout, source.fetch(&self.client))
                .await
                .unwrap_or_else(|_| Err(SourceError::Timeout(self.timeout)));
            let elapsed = started.elapsed();
            let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(products) => {
                    let outcome = if products.is_empty() {
                        AttemptOutcome::SuccessEmpty
                    } else {
                        AttemptOutcome::SuccessWithData(products.len())
                    };
                    info!(
                        source = %source.kind(),
                        location = %source,
                        outcome = outcome.label(),
                        count = products.len(),
                        elapsed_ms,
                        "Catalog source loaded"
                    );

                    let advisory = (!attempts.is_empty()).then(Advisory::fallback);
                    attempts.push(SourceAttempt {
                        source: source.kind(),
                        outcome,
                        elapsed,
                    });

                    return Ok(Resolution {
                        products,
                        source: source.kind(),
                        attempts,
                        advisory,
                    });
                }
                Err(e) => {
                    warn!(
                        source = %source.kind(),
                        location = %source,
                        outcome = "failed",
                        error = %e,
                        elapsed_ms,
                        "Catalog source failed"
                    );
                    attempts.push(SourceAttempt {
                        source: source.kind(),
                        outcome: AttemptOutcome::Failed(e.to_string()),
                        elapsed,
                    });
                }
            }
        }

        error!(attempts = attempts.len(), "All catalog sources failed");
        Err(ResolveError::Exhausted { attempts })
    }
}

/// `{base}/products`, tolerating a trailing slash on the base.
fn products_url(base: &Url) -> Result<Url, SourceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SourceError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push("products");
    Ok(url)
}

static LAST_CACHE_TOKEN: AtomicI64 = AtomicI64::new(0);

/// Unix millis, bumped so two fetches in the same millisecond still differ.
fn next_cache_token() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_CACHE_TOKEN
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}

fn cache_busted(mut url: Url) -> Url {
    url.query_pairs_mut()
        .append_pair("_", &next_cache_token().to_string());
    url
}

async fn fetch_json(client: &reqwest::Client, url: Url) -> Result<Vec<ProductRecord>, SourceError> {
    let response = client
        .get(cache_busted(url))
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    CatalogPayload::parse(&body).map_err(SourceError::Malformed)
}
