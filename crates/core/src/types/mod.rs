//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod email;
pub mod filter;
pub mod product;

pub use category::{CategoryOrder, UNCATEGORIZED};
pub use email::{Email, EmailError};
pub use filter::{CategorySelection, FilterState};
pub use product::{CatalogPayload, ProductId, ProductRecord, UNTITLED};
