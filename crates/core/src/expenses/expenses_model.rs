//! Expense ledger domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ledger row, written by the expense-entry module and read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub id: String,
    pub cost_center_id: i64,
    /// First day of the competence month.
    pub competence_month: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub department: Option<String>,
}

/// One month's bucket of ledger activity.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenses {
    pub total: f64,
    pub items: Vec<ExpenseEntry>,
}
