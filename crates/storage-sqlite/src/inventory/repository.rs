use std::sync::Arc;

use diesel::prelude::*;

use brickplan_core::inventory::{
    IdentityMappingRepositoryTrait, InventoryRepositoryTrait, UnitRecord,
};
use brickplan_core::Result;

use super::model::{IdentityMappingDB, InventoryUnitDB};
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::{identity_map, inventory_blocks, inventory_stages, inventory_units};

/// Read-only access to the cross-system identity map.
pub struct IdentityMappingRepository {
    pool: Arc<DbPool>,
}

impl IdentityMappingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        IdentityMappingRepository { pool }
    }
}

impl IdentityMappingRepositoryTrait for IdentityMappingRepository {
    fn resolve_cv_id(&self, erp_id: i64) -> Result<Option<i64>> {
        let mut conn = get_connection(&self.pool)?;
        // Sync runs can leave several rows per ERP id; the freshest wins.
        let mapping_db = identity_map::table
            .filter(identity_map::erp_id.eq(erp_id))
            .order(identity_map::updated_at.desc())
            .first::<IdentityMappingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(mapping_db.map(|m| m.cv_id))
    }
}

/// Read-only access to the CRM inventory hierarchy, flattened to units.
pub struct InventoryRepository {
    pool: Arc<DbPool>,
}

impl InventoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        InventoryRepository { pool }
    }
}

impl InventoryRepositoryTrait for InventoryRepository {
    fn units_for_property(&self, cv_id: i64) -> Result<Vec<UnitRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let units_db = inventory_units::table
            .inner_join(
                inventory_blocks::table.inner_join(inventory_stages::table),
            )
            .filter(inventory_stages::cv_property_id.eq(cv_id))
            .select(InventoryUnitDB::as_select())
            .load::<InventoryUnitDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(units_db.into_iter().map(UnitRecord::from).collect())
    }
}
