//! SQLite storage implementation for the inventory mirror.

mod model;
mod repository;

pub use model::{IdentityMappingDB, InventoryBlockDB, InventoryStageDB, InventoryUnitDB};
pub use repository::{IdentityMappingRepository, InventoryRepository};
