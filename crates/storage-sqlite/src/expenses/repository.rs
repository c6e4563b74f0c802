use std::sync::Arc;

use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;

use brickplan_core::expenses::{ExpenseEntry, ExpenseRepositoryTrait};
use brickplan_core::Result;

use super::model::ExpenseEntryDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::expense_entries;

/// Read-only access to the expense ledger mirrored from the ERP.
pub struct ExpenseRepository {
    pool: Arc<DbPool>,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ExpenseRepository { pool }
    }
}

impl ExpenseRepositoryTrait for ExpenseRepository {
    fn entries_in_range(
        &self,
        cost_center_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Vec<ExpenseEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let entries_db = expense_entries::table
            .filter(expense_entries::cost_center_id.eq(cost_center_id))
            .filter(expense_entries::competence_month.ge(start))
            .filter(expense_entries::competence_month.lt(end_exclusive))
            .order(expense_entries::competence_month.asc())
            .load::<ExpenseEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(entries_db.into_iter().map(ExpenseEntry::from).collect())
    }

    fn has_entries(&self, cost_center_id: i64) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = diesel::select(exists(
            expense_entries::table.filter(expense_entries::cost_center_id.eq(cost_center_id)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?;
        Ok(found)
    }
}
