use crate::errors::Result;
use crate::inventory::inventory_model::UnitRecord;

/// Trait for ERP <-> CRM identity mapping lookups.
pub trait IdentityMappingRepositoryTrait: Send + Sync {
    /// The CRM id from the most-recently-updated mapping row for this ERP
    /// id, or `None` when no mapping has been synced yet. Callers must
    /// tolerate an unresolved id.
    fn resolve_cv_id(&self, erp_id: i64) -> Result<Option<i64>>;
}

/// Trait for CRM inventory hierarchy access.
pub trait InventoryRepositoryTrait: Send + Sync {
    /// All leaf units of a CRM property, flattened through the
    /// property -> stage -> block -> unit hierarchy.
    fn units_for_property(&self, cv_id: i64) -> Result<Vec<UnitRecord>>;
}
