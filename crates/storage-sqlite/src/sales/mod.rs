//! SQLite storage implementation for sale contracts.

mod model;
mod repository;

pub use model::{SaleContractDB, SaleContractUnitDB};
pub use repository::SalesRepository;
