//! Database models for the mirrored CRM inventory hierarchy.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brickplan_core::inventory::{IdentityMapping, UnitRecord};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::identity_map)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct IdentityMappingDB {
    pub id: String,
    pub erp_id: i64,
    pub cv_id: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::inventory_stages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InventoryStageDB {
    pub id: i64,
    pub cv_property_id: i64,
    pub name: Option<String>,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(belongs_to(InventoryStageDB, foreign_key = stage_id))]
#[diesel(table_name = crate::schema::inventory_blocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InventoryBlockDB {
    pub id: i64,
    pub stage_id: i64,
    pub name: Option<String>,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(belongs_to(InventoryBlockDB, foreign_key = block_id))]
#[diesel(table_name = crate::schema::inventory_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InventoryUnitDB {
    pub id: String,
    pub block_id: i64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub blocked_since: Option<NaiveDateTime>,
}

impl From<IdentityMappingDB> for IdentityMapping {
    fn from(db: IdentityMappingDB) -> Self {
        Self {
            erp_id: db.erp_id,
            cv_id: db.cv_id,
            updated_at: db.updated_at,
        }
    }
}

impl From<InventoryUnitDB> for UnitRecord {
    fn from(db: InventoryUnitDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            status: db.status,
            blocked_since: db.blocked_since,
        }
    }
}
