//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static`
//!   (default: crates/storefront/static)
//! - `STOREFRONT_BASE_PATH` - Prefix for relative product image paths (default: empty)
//!
//! ## Catalog
//! - `CATALOG_API_BASE` - Remote catalog API base URL; `{base}/products` is fetched first
//! - `CATALOG_FALLBACK` - Local fallback, an http(s) URL or a file path
//!   (default: crates/storefront/static/products.json)
//! - `CATALOG_TIMEOUT_SECS` - Per-source timeout (default: 10)
//! - `CATALOG_CATEGORY_ORDER` - Comma-separated category order
//! - `CATALOG_WHATSAPP_NUMBER` - Recipient for product inquiries (default: 491727323405)
//! - `CATALOG_PLACEHOLDER_IMAGE` - Image used when a product image is missing or broken
//! - `CATALOG_SHOW_FILTERS` - Render the category filter controls (default: true)
//! - `CATALOG_SHOW_SEARCH` - Render the search input (default: true)
//!
//! ## Contact form
//! - `CONTACT_ENDPOINT` - Form submission endpoint (default: <https://formsubmit.co/api/submit>)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use banket_core::CategoryOrder;
use thiserror::Error;
use url::Url;

use crate::catalog::{CardContext, CatalogMounts, DEFAULT_TIMEOUT, FallbackLocation};

const DEFAULT_FALLBACK: &str = "crates/storefront/static/products.json";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";
const DEFAULT_CONTACT_ENDPOINT: &str = "https://formsubmit.co/api/submit";
const DEFAULT_WHATSAPP_NUMBER: &str = "491727323405";
const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Catalog sources and rendering
    pub catalog: CatalogConfig,
    /// Contact form forwarding
    pub contact: ContactConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog source and rendering configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Remote catalog API base, tried first when set
    pub api_base: Option<Url>,
    /// Local fallback resource
    pub fallback: FallbackLocation,
    /// Budget for each source attempt
    pub timeout: Duration,
    /// Category display order
    pub category_order: CategoryOrder,
    /// Settings shared by every product card
    pub card: CardContext,
    /// Optional page controls
    pub mounts: CatalogMounts,
}

/// Contact form forwarding configuration.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Third-party endpoint receiving the form as JSON
    pub endpoint: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            DEFAULT_STATIC_DIR,
        ));

        let catalog = CatalogConfig::from_env()?;
        let contact = ContactConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            static_dir,
            catalog,
            contact,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Load the catalog section from environment variables.
    ///
    /// Used by the storefront and by the CLI, which needs no server settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a catalog variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_base = get_optional_env("CATALOG_API_BASE")
            .map(|value| parse_url("CATALOG_API_BASE", &value))
            .transpose()?;
        let fallback = parse_fallback(&get_env_or_default("CATALOG_FALLBACK", DEFAULT_FALLBACK))?;
        let timeout = get_optional_env("CATALOG_TIMEOUT_SECS")
            .map(|value| parse_timeout("CATALOG_TIMEOUT_SECS", &value))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);
        let category_order = get_optional_env("CATALOG_CATEGORY_ORDER")
            .map(|list| CategoryOrder::parse_list(&list))
            .unwrap_or_default();

        let card = CardContext {
            base_path: get_env_or_default("STOREFRONT_BASE_PATH", ""),
            placeholder_image: get_env_or_default(
                "CATALOG_PLACEHOLDER_IMAGE",
                DEFAULT_PLACEHOLDER_IMAGE,
            ),
            whatsapp_number: get_env_or_default("CATALOG_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER),
        };
        let mounts = CatalogMounts {
            category_filter: parse_flag(
                "CATALOG_SHOW_FILTERS",
                get_optional_env("CATALOG_SHOW_FILTERS").as_deref(),
            )?,
            search_input: parse_flag(
                "CATALOG_SHOW_SEARCH",
                get_optional_env("CATALOG_SHOW_SEARCH").as_deref(),
            )?,
        };

        Ok(Self {
            api_base,
            fallback,
            timeout,
            category_order,
            card,
            mounts,
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            fallback: FallbackLocation::File(PathBuf::from(DEFAULT_FALLBACK)),
            timeout: DEFAULT_TIMEOUT,
            category_order: CategoryOrder::default(),
            card: CardContext {
                base_path: String::new(),
                placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
                whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            },
            mounts: CatalogMounts::default(),
        }
    }
}

impl ContactConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = parse_url(
            "CONTACT_ENDPOINT",
            &get_env_or_default("CONTACT_ENDPOINT", DEFAULT_CONTACT_ENDPOINT),
        )?;
        Ok(Self { endpoint })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_fallback(value: &str) -> Result<FallbackLocation, ConfigError> {
    FallbackLocation::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_FALLBACK".to_string(), e.to_string()))
}

fn parse_timeout(key: &str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "timeout must be at least 1 second".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Parse an on/off flag. Unset means on.
fn parse_flag(key: &str, value: Option<&str>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(true);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false, got '{other}'"),
        )),
    }
}
