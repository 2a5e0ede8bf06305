//! Storefront Core - Domain entities, services, and traits.
//!
//! This crate contains the category tree engine and the product listing
//! logic that consumes it. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod categories;
pub mod constants;
pub mod errors;
pub mod products;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
