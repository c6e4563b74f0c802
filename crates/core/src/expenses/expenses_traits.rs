use chrono::NaiveDate;

use crate::errors::Result;
use crate::expenses::expenses_model::ExpenseEntry;

/// Trait for expense ledger read access.
///
/// The window filter belongs in the underlying query, not in post-filtering.
pub trait ExpenseRepositoryTrait: Send + Sync {
    /// Ledger rows for a cost center with competence month in
    /// `[start, end_exclusive)`.
    fn entries_in_range(
        &self,
        cost_center_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Vec<ExpenseEntry>>;

    /// Cheap existence probe used by the listing operation to skip
    /// properties with no expense history at all.
    fn has_entries(&self, cost_center_id: i64) -> Result<bool>;
}
