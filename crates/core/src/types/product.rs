//! Product records as delivered by the catalog sources.
//!
//! Records are external, read-only input. Every field is optional on the
//! wire; the accessor methods resolve the documented defaults so callers
//! never deal with blank strings.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::category::UNCATEGORIZED;

/// Title shown for records without a usable title.
pub const UNTITLED: &str = "Unbenanntes Produkt";

/// Opaque product identifier.
///
/// Sources deliver either strings or numbers; both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// A single product as listed in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Pre-formatted price text (e.g. "ab 10 €"). Never parsed.
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topseller: Option<bool>,
}

impl ProductRecord {
    /// Title for display, falling back to [`UNTITLED`].
    #[must_use]
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or(UNTITLED)
    }

    /// Category bucket name, falling back to [`UNCATEGORIZED`].
    #[must_use]
    pub fn category_name(&self) -> &str {
        non_blank(self.category.as_deref()).unwrap_or(UNCATEGORIZED)
    }

    /// The single explanatory line: first non-empty of description, note, meta.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
            .or_else(|| non_blank(self.note.as_deref()))
            .or_else(|| non_blank(self.meta.as_deref()))
    }

    /// Price text, if present and non-blank.
    #[must_use]
    pub fn price_text(&self) -> Option<&str> {
        non_blank(self.price.as_deref())
    }

    /// Image reference as given by the source, if present and non-blank.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        non_blank(self.image.as_deref())
    }

    /// Key used for the detail page route: slug, else id.
    #[must_use]
    pub fn route_key(&self) -> Option<String> {
        non_blank(self.slug.as_deref())
            .map(str::to_owned)
            .or_else(|| self.id.as_ref().map(ToString::to_string))
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether the record is flagged as a topseller.
    #[must_use]
    pub fn is_topseller(&self) -> bool {
        self.topseller.unwrap_or(false)
    }
}

/// Body shape accepted from every catalog source.
///
/// Either a bare array of records or an object exposing a `products` array.
/// Anything else is malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    Bare(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

impl CatalogPayload {
    /// Parse a response body into a list of records.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body is neither a record array nor an
    /// object with a `products` array.
    pub fn parse(body: &str) -> Result<Vec<ProductRecord>, serde_json::Error> {
        serde_json::from_str::<Self>(body).map(Self::into_products)
    }

    /// Unwrap the record list.
    #[must_use]
    pub fn into_products(self) -> Vec<ProductRecord> {
        match self {
            Self::Bare(products) | Self::Wrapped { products } => products,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Accept price values delivered as strings or bare numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected price text, got {other}"
        ))),
    }
}
