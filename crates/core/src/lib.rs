//! BANKetTISCH Core - Catalog types and pure catalog logic.
//!
//! This crate provides the types and transformations shared by the
//! storefront server and the CLI:
//! - `storefront` - Public site serving the product catalog
//! - `cli` - Static rendering and data checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no templates. Everything here is deterministic and can be tested
//! without a server or a browser.
//!
//! # Modules
//!
//! - [`types`] - Product records, category order, filter state, email
//! - [`catalog`] - Category organizer and visibility filter
//! - [`html`] - Text escaping and anchor slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod html;
pub mod types;

pub use catalog::{CategoryBucket, organize, visible};
pub use html::{EscapedText, escape_html, slugify};
pub use types::*;
