//! Pure catalog transformations.
//!
//! - [`organize`] groups records into ordered category buckets
//! - [`visible`] applies the category and search predicates
//!
//! Both are deterministic and allocation-only; rendering code calls
//! `visible` first and hands the result to `organize`.

mod organize;
mod visible;

pub use organize::{CategoryBucket, organize};
pub use visible::{matches_query, visible};
