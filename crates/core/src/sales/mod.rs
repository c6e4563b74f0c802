//! Sales time-series aggregation over the ERP contract mirror.

mod sales_model;
mod sales_service;
mod sales_traits;

pub use sales_model::{ContractSituation, MonthlySales, SaleContract};
pub use sales_service::SalesAggregator;
pub use sales_traits::SalesRepositoryTrait;
