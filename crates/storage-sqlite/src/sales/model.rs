//! Database models for mirrored sale contracts.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brickplan_core::sales::{ContractSituation, SaleContract};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::sale_contracts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SaleContractDB {
    pub id: String,
    pub erp_property_id: i64,
    pub situation: String,
    pub reference_date: NaiveDate,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(belongs_to(SaleContractDB, foreign_key = contract_id))]
#[diesel(table_name = crate::schema::sale_contract_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SaleContractUnitDB {
    pub id: String,
    pub contract_id: String,
    pub unit_label: String,
}

impl SaleContractDB {
    /// Joins the contract row with its unit labels into the domain model.
    pub fn into_domain(self, units: Vec<String>) -> SaleContract {
        SaleContract {
            id: self.id,
            erp_property_id: self.erp_property_id,
            situation: ContractSituation::from_raw(&self.situation),
            reference_date: self.reference_date,
            units,
        }
    }
}
