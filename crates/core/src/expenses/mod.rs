//! Expense time-series aggregation over the ERP ledger mirror.

mod expenses_model;
mod expenses_service;
mod expenses_traits;

pub use expenses_model::{ExpenseEntry, MonthlyExpenses};
pub use expenses_service::ExpenseAggregator;
pub use expenses_traits::ExpenseRepositoryTrait;
