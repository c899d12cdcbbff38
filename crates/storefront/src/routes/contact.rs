//! Contact form route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::{ContactForm, validate_contact_form};
use crate::state::AppState;

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Submit the contact form.
///
/// POST /kontakt
///
/// Validation failures return 400 with a field map; a failed forward
/// returns 502.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>> {
    let contact = validate_contact_form(&form)?;
    let product = contact.product.as_deref().unwrap_or_default();
    add_breadcrumb(
        "contact",
        "Contact form submitted",
        Some(&[("product", product)]),
    );

    state.contact().submit(&contact).await?;

    Ok(Json(ContactResponse {
        success: true,
        message: Some("Form submitted successfully!".to_string()),
    }))
}
