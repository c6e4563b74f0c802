//! Database models for projection plans.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brickplan_core::errors::Error;
use brickplan_core::periods::MonthKey;
use brickplan_core::projections::{Projection, ProjectionLine, PropertyDefaults};

use crate::errors::StorageError;

/// Database model for a projection plan.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::projections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ProjectionDB {
    pub id: String,
    pub year: i32,
    pub name: String,
    pub is_locked: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for per-property plan defaults.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::projection_defaults)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefaultsDB {
    pub id: String,
    pub projection_id: String,
    pub property_key: String,
    pub plan_variant: String,
    pub marketing_pct: f64,
    pub enterprise_name: Option<String>,
    pub cost_center_id: Option<i64>,
    pub external_erp_id: Option<i64>,
    pub external_cv_id: Option<i64>,
}

/// Database model for a monthly target line. The month is stored in its
/// canonical `YYYY-MM` text form.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::projection_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ProjectionLineDB {
    pub id: String,
    pub projection_id: String,
    pub property_key: String,
    pub plan_variant: String,
    pub year_month: String,
    pub units_target: i32,
    pub avg_price_target: f64,
    pub marketing_pct: Option<f64>,
}

impl From<ProjectionDB> for Projection {
    fn from(db: ProjectionDB) -> Self {
        Self {
            id: db.id,
            year: db.year,
            name: db.name,
            is_locked: db.is_locked,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<PropertyDefaultsDB> for PropertyDefaults {
    fn from(db: PropertyDefaultsDB) -> Self {
        Self {
            id: db.id,
            projection_id: db.projection_id,
            property_key: db.property_key,
            plan_variant: db.plan_variant,
            marketing_pct: db.marketing_pct,
            enterprise_name: db.enterprise_name,
            cost_center_id: db.cost_center_id,
            external_erp_id: db.external_erp_id,
            external_cv_id: db.external_cv_id,
        }
    }
}

impl From<PropertyDefaults> for PropertyDefaultsDB {
    fn from(domain: PropertyDefaults) -> Self {
        Self {
            id: domain.id,
            projection_id: domain.projection_id,
            property_key: domain.property_key,
            plan_variant: domain.plan_variant,
            marketing_pct: domain.marketing_pct,
            enterprise_name: domain.enterprise_name,
            cost_center_id: domain.cost_center_id,
            external_erp_id: domain.external_erp_id,
            external_cv_id: domain.external_cv_id,
        }
    }
}

// The stored month string can only be trusted as far as the write path
// enforced it, so the read conversion stays fallible.
impl TryFrom<ProjectionLineDB> for ProjectionLine {
    type Error = Error;

    fn try_from(db: ProjectionLineDB) -> Result<Self, Self::Error> {
        let year_month: MonthKey = db.year_month.parse().map_err(|_| {
            Error::from(StorageError::DecodeFailed(format!(
                "invalid stored month key '{}' on projection line {}",
                db.year_month, db.id
            )))
        })?;
        Ok(Self {
            id: db.id,
            projection_id: db.projection_id,
            property_key: db.property_key,
            plan_variant: db.plan_variant,
            year_month,
            units_target: db.units_target,
            avg_price_target: db.avg_price_target,
            marketing_pct: db.marketing_pct,
        })
    }
}

impl From<ProjectionLine> for ProjectionLineDB {
    fn from(domain: ProjectionLine) -> Self {
        Self {
            id: domain.id,
            projection_id: domain.projection_id,
            property_key: domain.property_key,
            plan_variant: domain.plan_variant,
            year_month: domain.year_month.to_string(),
            units_target: domain.units_target,
            avg_price_target: domain.avg_price_target,
            marketing_pct: domain.marketing_pct,
        }
    }
}
