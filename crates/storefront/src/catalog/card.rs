//! Product card view model.
//!
//! [`CardView::build`] turns one record into escaped, display-ready fields.
//! The markup lives in `templates/partials/product_card.html`.

use banket_core::{EscapedText, ProductRecord};

/// Settings shared by every card on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContext {
    /// Prefix for relative image paths
    pub base_path: String,
    /// Image shown when a product has none, or when it fails to load
    pub placeholder_image: String,
    /// Messaging recipient in international format without `+`
    pub whatsapp_number: String,
}

/// One product card, every field escaped for HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: EscapedText,
    pub image_src: EscapedText,
    pub placeholder: EscapedText,
    pub summary: Option<EscapedText>,
    pub price: Option<EscapedText>,
    pub contact_href: EscapedText,
    pub contact_label: EscapedText,
    pub detail_href: Option<EscapedText>,
    pub highlighted: bool,
}

impl CardView {
    #[must_use]
    pub fn build(product: &ProductRecord, ctx: &CardContext) -> Self {
        let title = product.display_title();
        let price = product.price_text();

        Self {
            title: EscapedText::new(title),
            image_src: EscapedText::new(&resolve_image(product.image_ref(), ctx)),
            placeholder: EscapedText::new(&ctx.placeholder_image),
            summary: product.summary().map(EscapedText::new),
            price: price.map(EscapedText::new),
            contact_href: EscapedText::new(&whatsapp_href(&ctx.whatsapp_number, title, price)),
            contact_label: EscapedText::new(&format!("Per WhatsApp anfragen: {title}")),
            detail_href: product
                .route_key()
                .map(|key| EscapedText::new(&format!("/{}.html", urlencoding::encode(&key)))),
            highlighted: product.is_topseller(),
        }
    }
}

/// Absolute URLs and root paths pass through, relative paths get the base
/// path, and a missing image becomes the placeholder.
fn resolve_image(image: Option<&str>, ctx: &CardContext) -> String {
    let Some(image) = image.map(str::trim) else {
        return ctx.placeholder_image.clone();
    };

    let lower = image.to_ascii_lowercase();
    let absolute = ["http://", "https://", "data:", "/"]
        .iter()
        .any(|prefix| lower.starts_with(prefix));
    if absolute {
        return image.to_string();
    }

    let base = ctx.base_path.trim_end_matches('/');
    let relative = image.trim_start_matches("./");
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}/{relative}")
    }
}

/// `https://wa.me/<number>?text=<encoded>`
fn whatsapp_href(number: &str, title: &str, price: Option<&str>) -> String {
    let text = match price {
        Some(price) => format!("Hallo! Ich interessiere mich für: {title} ({price})"),
        None => format!("Hallo! Ich interessiere mich für: {title}"),
    };
    format!("https://wa.me/{number}?text={}", urlencoding::encode(&text))
}
