//! Brickplan Core - Domain entities, services, and traits.
//!
//! This crate contains the sales-projection budget viability engine.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod expenses;
pub mod inventory;
pub mod periods;
pub mod projections;
pub mod sales;
pub mod viability;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
