//! Projection (sales plan) domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::periods::MonthKey;

/// Errors specific to projection plans.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// No plan is flagged active. Fatal for any viability computation.
    #[error("no active projection plan exists")]
    NoActivePlan,

    #[error("projection plan '{0}' is locked against edits")]
    PlanLocked(String),

    #[error("projection plan '{0}' not found")]
    NotFound(String),
}

/// One planning cycle. At most one plan per year is active; the activation
/// write path deactivates same-year siblings transactionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub id: String,
    pub year: i32,
    pub name: String,
    pub is_locked: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a plan (directly or as a clone).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjection {
    pub id: Option<String>,
    pub year: i32,
    pub name: String,
}

/// Per-(plan, property, variant) defaults: the fallback marketing
/// percentage, a cached display name, and the external linkage used when a
/// caller does not supply ids explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefaults {
    pub id: String,
    pub projection_id: String,
    pub property_key: String,
    pub plan_variant: String,
    pub marketing_pct: f64,
    pub enterprise_name: Option<String>,
    /// ERP cost-center id backing the expense ledger.
    pub cost_center_id: Option<i64>,
    /// ERP property id backing the sales source.
    pub external_erp_id: Option<i64>,
    /// CRM property id backing the inventory hierarchy.
    pub external_cv_id: Option<i64>,
}

/// One target line per (plan, property, variant, month).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionLine {
    pub id: String,
    pub projection_id: String,
    pub property_key: String,
    pub plan_variant: String,
    pub year_month: MonthKey,
    pub units_target: i32,
    pub avg_price_target: f64,
    /// Per-month override; a positive value beats the property default.
    pub marketing_pct: Option<f64>,
}

impl ProjectionLine {
    /// The marketing percentage in effect for this month: the line's
    /// override if positive, otherwise the property default (which may
    /// itself be an explicit zero).
    pub fn effective_marketing_pct(&self, default_pct: f64) -> f64 {
        match self.marketing_pct {
            Some(pct) if pct > 0.0 => pct,
            _ => default_pct,
        }
    }
}

/// Bulk upsert entry for property defaults. `remove` deletes the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsUpsert {
    pub property_key: String,
    pub plan_variant: String,
    pub marketing_pct: f64,
    pub enterprise_name: Option<String>,
    pub cost_center_id: Option<i64>,
    pub external_erp_id: Option<i64>,
    pub external_cv_id: Option<i64>,
    #[serde(default)]
    pub remove: bool,
}

/// Bulk upsert entry for a monthly target line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineUpsert {
    pub property_key: String,
    pub plan_variant: String,
    pub year_month: MonthKey,
    pub units_target: i32,
    pub avg_price_target: f64,
    pub marketing_pct: Option<f64>,
}

/// The plan slice the viability calculator works from: one defaults row (if
/// linked) and the property's target lines, unfiltered by window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanData {
    pub defaults: Option<PropertyDefaults>,
    pub lines: Vec<ProjectionLine>,
}
