//! Sales contract domain models mirrored from the ERP.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ERP contract situation. Only issued and authorized contracts count
/// toward units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractSituation {
    Issued,
    Authorized,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl ContractSituation {
    pub fn as_str(&self) -> &str {
        match self {
            ContractSituation::Issued => "issued",
            ContractSituation::Authorized => "authorized",
            ContractSituation::Cancelled => "cancelled",
            ContractSituation::Other(s) => s.as_str(),
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "issued" => ContractSituation::Issued,
            "authorized" => ContractSituation::Authorized,
            "cancelled" => ContractSituation::Cancelled,
            other => ContractSituation::Other(other.to_string()),
        }
    }

    /// The situations counted as a completed sale.
    pub fn counted() -> &'static [ContractSituation] {
        static COUNTED: [ContractSituation; 2] =
            [ContractSituation::Issued, ContractSituation::Authorized];
        &COUNTED
    }
}

/// A contract row keyed by the ERP property id, with its associated unit
/// labels (possibly empty).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleContract {
    pub id: String,
    pub erp_property_id: i64,
    pub situation: ContractSituation,
    pub reference_date: NaiveDate,
    pub units: Vec<String>,
}

impl SaleContract {
    /// Units this contract contributes to its reference month: every
    /// associated unit, but never less than one sale.
    pub fn unit_count(&self) -> i32 {
        self.units.len().max(1) as i32
    }
}

/// One month's bucket of counted sales.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub sold_units: i32,
    pub contracts: Vec<SaleContract>,
}
