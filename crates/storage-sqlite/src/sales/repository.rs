use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;

use brickplan_core::sales::{ContractSituation, SaleContract, SalesRepositoryTrait};
use brickplan_core::Result;

use super::model::{SaleContractDB, SaleContractUnitDB};
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::{sale_contract_units, sale_contracts};

/// Read-only access to sale contracts mirrored from the ERP.
pub struct SalesRepository {
    pool: Arc<DbPool>,
}

impl SalesRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SalesRepository { pool }
    }
}

impl SalesRepositoryTrait for SalesRepository {
    fn contracts_in_range(
        &self,
        erp_property_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        situations: &[ContractSituation],
    ) -> Result<Vec<SaleContract>> {
        let mut conn = get_connection(&self.pool)?;

        let situation_values: Vec<&str> = situations.iter().map(|s| s.as_str()).collect();
        let contracts_db = sale_contracts::table
            .filter(sale_contracts::erp_property_id.eq(erp_property_id))
            .filter(sale_contracts::reference_date.ge(start))
            .filter(sale_contracts::reference_date.lt(end_exclusive))
            .filter(sale_contracts::situation.eq_any(&situation_values))
            .order(sale_contracts::reference_date.asc())
            .load::<SaleContractDB>(&mut conn)
            .map_err(StorageError::from)?;

        let units_db = SaleContractUnitDB::belonging_to(&contracts_db)
            .load::<SaleContractUnitDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut units_by_contract: HashMap<String, Vec<String>> = HashMap::new();
        for unit in units_db {
            units_by_contract
                .entry(unit.contract_id)
                .or_default()
                .push(unit.unit_label);
        }

        Ok(contracts_db
            .into_iter()
            .map(|contract| {
                let units = units_by_contract.remove(&contract.id).unwrap_or_default();
                contract.into_domain(units)
            })
            .collect())
    }
}
