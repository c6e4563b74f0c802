use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::periods::{MonthKey, ResolvedPeriod};
use crate::sales::sales_model::{ContractSituation, MonthlySales};
use crate::sales::sales_traits::SalesRepositoryTrait;

/// Counts units transacted per month for a property, filtered to the
/// issued/authorized contract states.
pub struct SalesAggregator {
    repository: Arc<dyn SalesRepositoryTrait>,
}

impl SalesAggregator {
    pub fn new(repository: Arc<dyn SalesRepositoryTrait>) -> Self {
        SalesAggregator { repository }
    }

    /// A mapping from every month of the window to its sales bucket.
    ///
    /// No ERP id means no sales source is wired up yet; the all-zero map is
    /// returned without attempting a repository call.
    pub fn count_units_by_month(
        &self,
        erp_property_id: Option<i64>,
        period: &ResolvedPeriod,
    ) -> Result<BTreeMap<MonthKey, MonthlySales>> {
        let mut by_month: BTreeMap<MonthKey, MonthlySales> = period
            .months
            .iter()
            .map(|m| (*m, MonthlySales::default()))
            .collect();

        let erp_property_id = match erp_property_id {
            Some(id) => id,
            None => return Ok(by_month),
        };

        let contracts = self.repository.contracts_in_range(
            erp_property_id,
            period.start_date,
            period.end_exclusive,
            ContractSituation::counted(),
        )?;
        debug!(
            "Counting {} contracts for ERP property {}",
            contracts.len(),
            erp_property_id
        );

        for contract in contracts {
            let key = MonthKey::from_date(contract.reference_date);
            if let Some(bucket) = by_month.get_mut(&key) {
                bucket.sold_units += contract.unit_count();
                bucket.contracts.push(contract);
            }
        }

        Ok(by_month)
    }
}
