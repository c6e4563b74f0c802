//! SQLite storage implementation for projection plans.

mod model;
mod repository;

pub use model::{ProjectionDB, ProjectionLineDB, PropertyDefaultsDB};
pub use repository::ProjectionRepository;
