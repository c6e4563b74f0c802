use chrono::NaiveDate;

use crate::errors::Result;
use crate::sales::sales_model::{ContractSituation, SaleContract};

/// Trait for sales source read access.
pub trait SalesRepositoryTrait: Send + Sync {
    /// Contracts for an ERP property with reference date in
    /// `[start, end_exclusive)` and situation in `situations`.
    fn contracts_in_range(
        &self,
        erp_property_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        situations: &[ContractSituation],
    ) -> Result<Vec<SaleContract>>;
}
