use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::expenses::expenses_model::MonthlyExpenses;
use crate::expenses::expenses_traits::ExpenseRepositoryTrait;
use crate::periods::{MonthKey, ResolvedPeriod};

/// Sums ledger entries tied to a cost center into one bucket per month of
/// the reporting window.
pub struct ExpenseAggregator {
    repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl ExpenseAggregator {
    pub fn new(repository: Arc<dyn ExpenseRepositoryTrait>) -> Self {
        ExpenseAggregator { repository }
    }

    /// A mapping from every month of the window to its expense bucket.
    ///
    /// A plan line with no linked cost center is valid and simply shows no
    /// actuals, so `cost_center_id = None` yields the zero-filled map
    /// without touching the repository.
    pub fn sum_by_month(
        &self,
        cost_center_id: Option<i64>,
        period: &ResolvedPeriod,
    ) -> Result<BTreeMap<MonthKey, MonthlyExpenses>> {
        let mut by_month: BTreeMap<MonthKey, MonthlyExpenses> = period
            .months
            .iter()
            .map(|m| (*m, MonthlyExpenses::default()))
            .collect();

        let cost_center_id = match cost_center_id {
            Some(id) => id,
            None => return Ok(by_month),
        };

        let entries = self.repository.entries_in_range(
            cost_center_id,
            period.start_date,
            period.end_exclusive,
        )?;
        debug!(
            "Aggregating {} expense entries for cost center {}",
            entries.len(),
            cost_center_id
        );

        for entry in entries {
            let key = MonthKey::from_date(entry.competence_month);
            if let Some(bucket) = by_month.get_mut(&key) {
                bucket.total += entry.amount;
                bucket.items.push(entry);
            }
        }

        Ok(by_month)
    }

    pub fn has_history(&self, cost_center_id: Option<i64>) -> Result<bool> {
        match cost_center_id {
            Some(id) => self.repository.has_entries(id),
            None => Ok(false),
        }
    }
}
