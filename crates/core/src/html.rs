//! Text escaping and slug helpers for HTML output.
//!
//! Product data is untrusted. Every product-supplied string goes through
//! [`escape_html`] before it reaches markup, and the result is carried as
//! [`EscapedText`] so templates can tell escaped text from raw text.

use core::fmt;

/// Text that has been escaped for use in HTML content and quoted attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EscapedText(String);

impl EscapedText {
    /// Escape `raw` and wrap it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(escape_html(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for EscapedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EscapedText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Escape the five HTML-significant characters.
///
/// `&` `<` `>` `"` `'` become `&amp;` `&lt;` `&gt;` `&quot;` `&#39;`.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build a URL-safe anchor slug from a category name.
///
/// German umlauts and ß are transliterated, everything else outside
/// `[a-z0-9]` collapses into single dashes.
///
/// ```
/// assert_eq!(banket_core::slugify("Zelte und Pavillons"), "zelte-und-pavillons");
/// assert_eq!(banket_core::slugify("Gastrozubehör"), "gastrozubehoer");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let mapped: Option<&str> = match c {
            'ä' => Some("ae"),
            'ö' => Some("oe"),
            'ü' => Some("ue"),
            'ß' => Some("ss"),
            _ => None,
        };

        if let Some(replacement) = mapped {
            push_slug_part(&mut slug, &mut pending_dash, replacement);
        } else if c.is_ascii_alphanumeric() {
            let mut buf = [0u8; 4];
            push_slug_part(&mut slug, &mut pending_dash, c.encode_utf8(&mut buf));
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn push_slug_part(slug: &mut String, pending_dash: &mut bool, part: &str) {
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push_str(part);
}
