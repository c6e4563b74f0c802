//! Budget viability reporting.
//!
//! Combines plan targets, expense actuals, sale counts, and the inventory
//! summary into the per-property viability report: planned budgets per
//! month, actual-versus-planned deltas, the forward redistribution of
//! unspent budget across remaining months, and the inventory-versus-plan
//! reconciliation.

pub mod calculator;
mod viability_model;
mod viability_service;

pub use viability_model::{
    CurrentMonthDigest, MonthRawData, MonthStatus, ViabilityError, ViabilityHeader,
    ViabilityListItem, ViabilityListing, ViabilityMonth, ViabilityQuery, ViabilityReport,
};
pub use viability_service::{ViabilityService, ViabilityServiceTrait};

#[cfg(test)]
mod viability_service_tests;
