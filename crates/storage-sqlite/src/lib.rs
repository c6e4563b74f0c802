//! SQLite storage implementation for the Brickplan viability engine.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `brickplan-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the plan store and the mirrored
//!   ERP/CRM tables (expenses, sale contracts, identity map, inventory)
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place where Diesel dependencies exist; `core` is
//! database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod expenses;
pub mod inventory;
pub mod projections;
pub mod sales;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from brickplan-core for convenience
pub use brickplan_core::errors::{DatabaseError, Error, Result};
