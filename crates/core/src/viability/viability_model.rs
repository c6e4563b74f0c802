//! Viability report models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expenses::ExpenseEntry;
use crate::inventory::InventorySummary;
use crate::periods::{MonthKey, PeriodQuery};
use crate::sales::SaleContract;

/// Errors specific to viability report assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViabilityError {
    /// The property key is the caller's responsibility; unlike the external
    /// ids it never degrades gracefully.
    #[error("a property key is required")]
    MissingPropertyKey,
}

/// Request for a single-property viability report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityQuery {
    pub property_key: String,
    #[serde(default)]
    pub plan_variant: Option<String>,
    pub period: PeriodQuery,
    /// Explicit ERP property id; falls back to the plan defaults linkage.
    #[serde(default)]
    pub external_erp_id: Option<i64>,
    /// Explicit CRM id; falls back to defaults, then the identity mapping.
    #[serde(default)]
    pub external_cv_id: Option<i64>,
    /// Explicit cost-center id; falls back to the plan defaults linkage.
    #[serde(default)]
    pub cost_center_id: Option<i64>,
}

/// Spent-versus-budget classification for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthStatus {
    Over,
    Under,
    OnTrack,
}

/// The raw rows backing one month's figures, carried for drill-down.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthRawData {
    pub expenses: Vec<ExpenseEntry>,
    pub contracts: Vec<SaleContract>,
}

/// One month of the viability report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityMonth {
    pub year_month: MonthKey,
    pub units_target: i32,
    pub avg_price_target: f64,
    pub revenue_target: f64,
    pub units_sold_real: i32,
    /// Budget proportional to this month's unit target, rescaled so the
    /// series sums exactly to the total budget.
    pub planned_budget: f64,
    /// Planned budget after the forward re-forecast past the boundary month.
    pub adjusted_budget: f64,
    pub spent: f64,
    pub diff: f64,
    pub status: MonthStatus,
    pub cumulative_planned: f64,
    pub cumulative_adjusted: f64,
    pub cumulative_spent: f64,
    pub raw: MonthRawData,
}

/// Digest of the window's last month, surfaced for UI convenience.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMonthDigest {
    pub year_month: MonthKey,
    pub month_budget: f64,
    pub month_spent: f64,
    pub month_remaining: f64,
}

/// Aggregate figures for the whole reporting window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityHeader {
    // Targets
    pub units_target_total: i32,
    pub revenue_target_total: f64,
    pub avg_ticket_global: f64,
    pub marketing_pct: f64,
    pub budget_total: f64,

    // Actuals
    pub spent_total: f64,
    pub sold_units_real_ytd: i32,

    // Unit economics
    pub planned_cost_per_unit: f64,
    pub current_real_cost_per_unit: f64,

    // Remaining-plan accounting
    pub remaining_units_plan: i32,
    pub allowed_budget_so_far: f64,
    pub over_under_so_far: f64,
    pub remaining_budget_standard: f64,
    pub remaining_budget_effective: f64,
    pub remaining_cost_per_unit_effective: f64,

    // Inventory reconciliation
    pub inventory: InventorySummary,
    pub logical_units_for_plan: i32,
    pub inventory_after_projection_units: i32,
    pub inventory_after_projection_revenue: f64,
    pub inventory_after_projection_budget: f64,

    pub current_month: CurrentMonthDigest,
}

/// Single-property viability report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityReport {
    pub property_key: String,
    pub plan_id: String,
    pub plan_variant: String,
    pub start_month: MonthKey,
    pub end_month: MonthKey,
    pub header: ViabilityHeader,
    pub months: Vec<ViabilityMonth>,
}

/// One surviving property in the listing operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityListItem {
    pub property_key: String,
    pub external_erp_id: Option<i64>,
    pub resolved_cv_id: Option<i64>,
    pub cost_center_id: Option<i64>,
    pub enterprise_name: Option<String>,
    pub header: ViabilityHeader,
}

/// Viability headers across every property with live plan coverage.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityListing {
    pub plan_id: String,
    pub plan_variant: String,
    pub start_month: MonthKey,
    pub end_month: MonthKey,
    pub count: usize,
    pub results: Vec<ViabilityListItem>,
}
