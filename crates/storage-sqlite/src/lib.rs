//! SQLite storage implementation for the storefront.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `storefront-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Embedded Diesel migrations
//! - Repository implementations for categories and products
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `storefront-core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain, tree engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod categories;
pub mod products;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use categories::CategoryRepository;
pub use products::ProductRepository;

// Re-export from storefront-core for convenience
pub use storefront_core::errors::{DatabaseError, Error, Result};
