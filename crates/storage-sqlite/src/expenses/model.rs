//! Database models for the mirrored expense ledger.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brickplan_core::expenses::ExpenseEntry;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntryDB {
    pub id: String,
    pub cost_center_id: i64,
    pub competence_month: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub department: Option<String>,
}

impl From<ExpenseEntryDB> for ExpenseEntry {
    fn from(db: ExpenseEntryDB) -> Self {
        Self {
            id: db.id,
            cost_center_id: db.cost_center_id,
            competence_month: db.competence_month,
            amount: db.amount,
            description: db.description,
            department: db.department,
        }
    }
}

impl From<ExpenseEntry> for ExpenseEntryDB {
    fn from(domain: ExpenseEntry) -> Self {
        Self {
            id: domain.id,
            cost_center_id: domain.cost_center_id,
            competence_month: domain.competence_month,
            amount: domain.amount,
            description: domain.description,
            department: domain.department,
        }
    }
}
