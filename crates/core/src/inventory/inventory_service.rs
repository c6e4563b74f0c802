use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::inventory::classifier::classify_unit_status;
use crate::inventory::inventory_model::{InventorySummary, UnitCondition, UnitRecord};
use crate::inventory::inventory_traits::{
    IdentityMappingRepositoryTrait, InventoryRepositoryTrait,
};

/// Resolves a property's CRM identity and summarizes its current stock.
pub struct InventoryResolver {
    identity_repository: Arc<dyn IdentityMappingRepositoryTrait>,
    inventory_repository: Arc<dyn InventoryRepositoryTrait>,
}

impl InventoryResolver {
    pub fn new(
        identity_repository: Arc<dyn IdentityMappingRepositoryTrait>,
        inventory_repository: Arc<dyn InventoryRepositoryTrait>,
    ) -> Self {
        InventoryResolver {
            identity_repository,
            inventory_repository,
        }
    }

    pub fn resolve_cv_id(&self, erp_id: i64) -> Result<Option<i64>> {
        self.identity_repository.resolve_cv_id(erp_id)
    }

    /// Stock counts for a resolved CRM property. An unresolved property
    /// degrades to the all-zero summary rather than an error.
    pub fn summarize(&self, cv_id: Option<i64>) -> Result<InventorySummary> {
        let cv_id = match cv_id {
            Some(id) => id,
            None => return Ok(InventorySummary::default()),
        };
        let units = self.inventory_repository.units_for_property(cv_id)?;
        debug!("Summarizing {} units for CRM property {}", units.len(), cv_id);
        Ok(summarize_units(&units))
    }
}

/// Classifies every leaf unit and accumulates the stock counts.
pub fn summarize_units(units: &[UnitRecord]) -> InventorySummary {
    let mut summary = InventorySummary::default();
    for unit in units {
        summary.total_units += 1;
        match classify_unit_status(unit.status.as_deref(), unit.blocked_since) {
            UnitCondition::Sold => summary.sold_units_stock += 1,
            UnitCondition::Reserved => summary.reserved_units += 1,
            UnitCondition::Blocked => summary.blocked_units += 1,
            UnitCondition::Available => summary.available_units += 1,
        }
    }
    summary.available_inventory =
        summary.available_units + summary.reserved_units + summary.blocked_units;
    summary
}
