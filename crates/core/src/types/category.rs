//! Configured category ordering.

use serde::{Deserialize, Serialize};

/// Bucket label for products without a category.
pub const UNCATEGORIZED: &str = "Sonstige";

/// Category order used by the site when nothing else is configured.
pub const DEFAULT_CATEGORY_ORDER: &[&str] = &[
    "Mietmöbel",
    "Dekoration und Verkleidung",
    "Zubehör",
    "Zelte und Pavillons",
    "Personal",
    "Gastrozubehör",
];

/// An ordered, duplicate-free sequence of category names.
///
/// Categories in this sequence render first, in this order. Anything else
/// renders afterward (see [`crate::catalog::organize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryOrder(Vec<String>);

impl CategoryOrder {
    /// Build an order from names. Blank entries and repeats are dropped,
    /// the first occurrence wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !order.iter().any(|existing| existing == name) {
                order.push(name.to_owned());
            }
        }
        Self(order)
    }

    /// Parse a comma-separated list, e.g. `"Mietmöbel, Zubehör"`.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Position of a category in the configured sequence.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_ORDER)
    }
}

impl From<Vec<String>> for CategoryOrder {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<CategoryOrder> for Vec<String> {
    fn from(order: CategoryOrder) -> Self {
        order.0
    }
}
