//! Outbound integrations for the storefront.
//!
//! - `contact` - Contact form validation and forwarding

pub mod contact;

pub use contact::{
    ContactClient, ContactError, ContactErrors, ContactForm, ValidContact, validate_contact_form,
};
