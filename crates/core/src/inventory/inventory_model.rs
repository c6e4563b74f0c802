//! Inventory domain models mirrored from the CRM unit hierarchy.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A leaf unit of the property -> stage -> block -> unit hierarchy.
///
/// The CRM delivers the status either as a small numeric code or as free
/// text, so it is kept raw here and interpreted by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub blocked_since: Option<NaiveDateTime>,
}

/// Derived classification of a unit; exactly one per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitCondition {
    Sold,
    Reserved,
    Blocked,
    Available,
}

/// Stock counts for a property.
///
/// `available_inventory` is everything not yet definitively sold:
/// available + reserved + blocked.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_units: i32,
    pub sold_units_stock: i32,
    pub reserved_units: i32,
    pub blocked_units: i32,
    pub available_units: i32,
    pub available_inventory: i32,
}

/// An ERP <-> CRM identity mapping row, written by an external sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMapping {
    pub erp_id: i64,
    pub cv_id: i64,
    pub updated_at: NaiveDateTime,
}
