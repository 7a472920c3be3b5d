//! SQLite storage implementation for orgbase.
//!
//! This crate provides all database-related functionality using Diesel with
//! SQLite. It implements the repository traits defined in `orgbase-core` and
//! contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The company settings repository
//! - Database-specific model types (with Diesel derives)
//!
//! This is the only crate where Diesel dependencies exist; everything above
//! it works against the core traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod settings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from orgbase-core for convenience
pub use orgbase_core::errors::{DatabaseError, Error, Result};
