//! Contact form validation and forwarding.
//!
//! Validated submissions are posted as JSON to a third-party form endpoint.
//! There is no retry; a failed submission is reported to the visitor.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use banket_core::{Email, EmailError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ContactConfig;

/// Budget for one submission.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when forwarding a submission.
#[derive(Debug, Error)]
pub enum ContactError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status.
    #[error("form endpoint returned status {0}")]
    Status(u16),
}

/// Contact form as posted by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Product the visitor asked about, if any
    #[serde(default)]
    pub product: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidContact {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

/// Field name to message, for every failed field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactErrors(BTreeMap<&'static str, &'static str>);

impl ContactErrors {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ContactErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ContactErrors {}

/// Validate a submission.
///
/// Name and email are required; the email must be structurally valid.
///
/// # Errors
///
/// Returns every failed field at once.
pub fn validate_contact_form(form: &ContactForm) -> Result<ValidContact, ContactErrors> {
    let mut errors = BTreeMap::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required");
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(EmailError::Empty) => {
            errors.insert("email", "Email is required");
            None
        }
        Err(_) => {
            errors.insert("email", "Email is invalid");
            None
        }
    };

    match email {
        Some(email) if errors.is_empty() => Ok(ValidContact {
            name: name.to_string(),
            email,
            phone: optional_text(form.phone.as_deref()),
            message: optional_text(form.message.as_deref()),
            product: optional_text(form.product.as_deref()),
        }),
        _ => Err(ContactErrors(errors)),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Client for the form endpoint.
#[derive(Debug, Clone)]
pub struct ContactClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ContactClient {
    /// Create a new contact client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ContactConfig) -> Result<Self, ContactError> {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Post the submission as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` on transport failure or a non-2xx status.
    #[instrument(skip(self, contact), fields(email = %contact.email))]
    pub async fn submit(&self, contact: &ValidContact) -> Result<(), ContactError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Status(status.as_u16()));
        }

        tracing::info!("Contact form forwarded");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            ..ContactForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let contact = validate_contact_form(&ContactForm {
            message: Some("  Stehtische für Samstag? ".to_string()),
            phone: Some("   ".to_string()),
            ..form(" Anna ", "anna@example.de")
        })
        .unwrap();

        assert_eq!(contact.name, "Anna");
        assert_eq!(contact.email.as_str(), "anna@example.de");
        assert_eq!(contact.message.as_deref(), Some("Stehtische für Samstag?"));
        assert!(contact.phone.is_none());
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_contact_form(&form("", "")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_invalid_email() {
        let errors = validate_contact_form(&form("Anna", "anna@localhost")).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_errors_serialize_as_map() {
        let errors = validate_contact_form(&form("", "x")).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], "Name is required");
        assert_eq!(json["email"], "Email is invalid");
        assert_eq!(errors.to_string(), "invalid fields: email, name");
    }

    #[test]
    fn test_valid_contact_serializes_without_empty_fields() {
        let contact = validate_contact_form(&form("Anna", "anna@example.de")).unwrap();
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Anna", "email": "anna@example.de"})
        );
    }
}
