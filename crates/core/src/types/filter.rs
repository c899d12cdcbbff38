//! Filter and search state for one catalog view.
//!
//! A `FilterState` lives for one page view. It is built from the request,
//! mutated only through the interaction methods below, and read by the
//! render step. Nothing is persisted across reloads.

use core::fmt;

/// The category control's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategorySelection {
    /// The "all" sentinel: every category passes.
    #[default]
    All,
    /// Exactly one category, matched case-sensitively.
    Only(String),
}

impl CategorySelection {
    /// Wire value of the "all" sentinel.
    pub const ALL: &'static str = "all";

    /// Parse a query-string value. Missing, blank, or `"all"` select everything.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | Self::ALL) => Self::All,
            Some(name) => Self::Only(name.to_owned()),
        }
    }

    /// Query-string value for this selection.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Only(name) => name,
        }
    }

    /// Whether a record in `category` passes this selection.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == category,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current category selection and free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: CategorySelection,
    pub query: String,
}

impl FilterState {
    #[must_use]
    pub fn new(category: CategorySelection, query: impl Into<String>) -> Self {
        Self {
            category,
            query: query.into(),
        }
    }

    /// Category control clicked. The query is kept.
    pub fn select_category(&mut self, selection: CategorySelection) {
        self.category = selection;
    }

    /// Search input changed. A search starts from the full catalog, so the
    /// category selection resets to all.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.category = CategorySelection::All;
    }

    /// The query as used for matching: trimmed and lowercased, `None` if blank.
    #[must_use]
    pub fn normalized_query(&self) -> Option<String> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// True when neither a category nor a query narrows the view.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_all() && self.normalized_query().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(CategorySelection::parse(None), CategorySelection::All);
        assert_eq!(CategorySelection::parse(Some("all")), CategorySelection::All);
        assert_eq!(CategorySelection::parse(Some("  ")), CategorySelection::All);
        assert_eq!(
            CategorySelection::parse(Some("Zubehör")),
            CategorySelection::Only("Zubehör".to_string())
        );
    }

    #[test]
    fn test_selection_is_case_sensitive() {
        let selection = CategorySelection::Only("Zubehör".to_string());
        assert!(selection.matches("Zubehör"));
        assert!(!selection.matches("zubehör"));
        assert!(CategorySelection::All.matches("anything"));
    }

    #[test]
    fn test_select_category_keeps_query() {
        let mut state = FilterState::new(CategorySelection::All, "tisch");
        state.select_category(CategorySelection::Only("Mietmöbel".to_string()));
        assert_eq!(state.query, "tisch");
        assert_eq!(state.category.as_str(), "Mietmöbel");
    }

    #[test]
    fn test_set_query_resets_category() {
        let mut state = FilterState::new(CategorySelection::Only("Mietmöbel".to_string()), "");
        state.set_query("Zelt");
        assert!(state.category.is_all());
        assert_eq!(state.normalized_query().as_deref(), Some("zelt"));
    }

    #[test]
    fn test_blank_query_is_unfiltered() {
        let state = FilterState::new(CategorySelection::All, "   ");
        assert!(state.normalized_query().is_none());
        assert!(state.is_unfiltered());
    }
}
