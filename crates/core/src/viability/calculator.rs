//! The budget viability calculation.
//!
//! Pure functions over data already aggregated per month: plan targets,
//! expense actuals, sale counts, and the inventory summary. Monetary
//! arithmetic is plain f64 throughout; the monthly allocation is rescaled so
//! its sum matches the window budget exactly, and the redistribution step
//! preserves that sum whenever spending has not yet exhausted the budget.

use std::collections::BTreeMap;

use crate::inventory::InventorySummary;
use crate::periods::MonthKey;
use crate::projections::{ProjectionLine, PropertyDefaults};
use crate::expenses::MonthlyExpenses;
use crate::sales::MonthlySales;

use super::viability_model::{
    CurrentMonthDigest, MonthRawData, MonthStatus, ViabilityHeader, ViabilityMonth,
};

/// Everything the calculator needs, already scoped to one property and one
/// resolved window.
pub struct CalculatorInput<'a> {
    pub months: &'a [MonthKey],
    pub lines: &'a [ProjectionLine],
    pub defaults: Option<&'a PropertyDefaults>,
    pub expenses: &'a BTreeMap<MonthKey, MonthlyExpenses>,
    pub sales: &'a BTreeMap<MonthKey, MonthlySales>,
    pub inventory: InventorySummary,
}

struct MonthTarget {
    units: i32,
    price: f64,
    effective_pct: f64,
}

/// Computes the full header and month series for one property.
///
/// # Panics
///
/// Panics when `input.months` is empty. Windows come from
/// [`PeriodQuery::resolve`](crate::periods::PeriodQuery::resolve), which
/// always yields at least one month; the end-month digest has no meaning
/// without one.
pub fn compute(input: CalculatorInput<'_>) -> (ViabilityHeader, Vec<ViabilityMonth>) {
    assert!(
        !input.months.is_empty(),
        "viability window must contain at least one month"
    );

    let default_pct = input.defaults.map(|d| d.marketing_pct).unwrap_or(0.0);

    let line_by_month: BTreeMap<MonthKey, &ProjectionLine> = input
        .lines
        .iter()
        .filter(|l| input.months.contains(&l.year_month))
        .map(|l| (l.year_month, l))
        .collect();

    // Step 1: per-month targets and the window marketing percentage.
    let targets: Vec<MonthTarget> = input
        .months
        .iter()
        .map(|m| match line_by_month.get(m) {
            Some(line) => MonthTarget {
                units: line.units_target.max(0),
                price: line.avg_price_target,
                effective_pct: line.effective_marketing_pct(default_pct),
            },
            None => MonthTarget {
                units: 0,
                price: 0.0,
                effective_pct: default_pct,
            },
        })
        .collect();

    let units_target_total: i32 = targets.iter().map(|t| t.units).sum();
    let revenue_target_total: f64 = targets.iter().map(|t| t.units as f64 * t.price).sum();
    let avg_ticket_global = if units_target_total > 0 {
        revenue_target_total / units_target_total as f64
    } else {
        0.0
    };
    let marketing_pct = targets
        .iter()
        .map(|t| t.effective_pct)
        .find(|pct| *pct > 0.0)
        .unwrap_or(default_pct);

    // Step 2: window budget.
    let budget_total = revenue_target_total * marketing_pct / 100.0;

    // Step 3: actuals.
    let spent: Vec<f64> = input
        .months
        .iter()
        .map(|m| input.expenses.get(m).map(|b| b.total).unwrap_or(0.0))
        .collect();
    let sold: Vec<i32> = input
        .months
        .iter()
        .map(|m| input.sales.get(m).map(|b| b.sold_units).unwrap_or(0))
        .collect();
    let spent_total: f64 = spent.iter().sum();
    let sold_units_real_ytd: i32 = sold.iter().sum();

    // Step 4: unit economics.
    let planned_cost_per_unit = if units_target_total > 0 {
        budget_total / units_target_total as f64
    } else {
        0.0
    };
    let current_real_cost_per_unit = if sold_units_real_ytd > 0 {
        spent_total / sold_units_real_ytd as f64
    } else {
        0.0
    };

    // Step 5: remaining-plan accounting.
    let remaining_units_plan = (units_target_total - sold_units_real_ytd).max(0);
    let allowed_budget_so_far = sold_units_real_ytd as f64 * planned_cost_per_unit;
    let over_under_so_far = spent_total - allowed_budget_so_far;
    let remaining_budget_standard = remaining_units_plan as f64 * planned_cost_per_unit;
    let remaining_budget_effective = (budget_total - spent_total).max(0.0);
    let remaining_cost_per_unit_effective = if remaining_units_plan > 0 {
        remaining_budget_effective / remaining_units_plan as f64
    } else {
        0.0
    };

    // Step 6: inventory reconciliation. Stock beyond the plan's targeted
    // units converts to implied revenue and implied marketing budget at the
    // window's own ratios.
    let logical_units_for_plan = input.inventory.available_inventory + sold_units_real_ytd;
    let inventory_after_projection_units = (logical_units_for_plan - units_target_total).max(0);
    let inventory_after_projection_revenue =
        inventory_after_projection_units as f64 * avg_ticket_global;
    let inventory_after_projection_budget =
        inventory_after_projection_revenue * marketing_pct / 100.0;

    // Step 7: proportional monthly allocation, rescaled so the series sums
    // exactly to the window budget.
    let mut planned: Vec<f64> = targets
        .iter()
        .map(|t| t.units as f64 * planned_cost_per_unit)
        .collect();
    let planned_sum: f64 = planned.iter().sum();
    if planned_sum != 0.0 {
        let scale = budget_total / planned_sum;
        for value in planned.iter_mut() {
            *value *= scale;
        }
    }

    // Step 8: redistribution. Months at or before the last month with spend
    // keep their allocation; the unspent remainder is re-spread across the
    // units still planned after the boundary.
    let mut adjusted = planned.clone();
    if let Some(boundary) = spent.iter().rposition(|s| *s != 0.0) {
        let spent_so_far: f64 = spent[..=boundary].iter().sum();
        let remaining_budget = (budget_total - spent_so_far).max(0.0);
        let remaining_units_target: i32 = targets[boundary + 1..].iter().map(|t| t.units).sum();
        for (i, slot) in adjusted.iter_mut().enumerate().skip(boundary + 1) {
            *slot = if remaining_units_target > 0 {
                targets[i].units as f64 * (remaining_budget / remaining_units_target as f64)
            } else {
                0.0
            };
        }
    }

    // Steps 9-10: per-month statuses, cumulatives, and the end-month digest.
    let mut months_out = Vec::with_capacity(input.months.len());
    let mut cumulative_planned = 0.0;
    let mut cumulative_adjusted = 0.0;
    let mut cumulative_spent = 0.0;
    for (i, month) in input.months.iter().enumerate() {
        cumulative_planned += planned[i];
        cumulative_adjusted += adjusted[i];
        cumulative_spent += spent[i];

        let diff = spent[i] - adjusted[i];
        let status = if diff > 0.0 {
            MonthStatus::Over
        } else if diff < 0.0 {
            MonthStatus::Under
        } else {
            MonthStatus::OnTrack
        };

        months_out.push(ViabilityMonth {
            year_month: *month,
            units_target: targets[i].units,
            avg_price_target: targets[i].price,
            revenue_target: targets[i].units as f64 * targets[i].price,
            units_sold_real: sold[i],
            planned_budget: planned[i],
            adjusted_budget: adjusted[i],
            spent: spent[i],
            diff,
            status,
            cumulative_planned,
            cumulative_adjusted,
            cumulative_spent,
            raw: MonthRawData {
                expenses: input
                    .expenses
                    .get(month)
                    .map(|b| b.items.clone())
                    .unwrap_or_default(),
                contracts: input
                    .sales
                    .get(month)
                    .map(|b| b.contracts.clone())
                    .unwrap_or_default(),
            },
        });
    }

    let last = months_out.len() - 1;
    let current_month = CurrentMonthDigest {
        year_month: input.months[last],
        month_budget: adjusted[last],
        month_spent: spent[last],
        month_remaining: adjusted[last] - spent[last],
    };

    let header = ViabilityHeader {
        units_target_total,
        revenue_target_total,
        avg_ticket_global,
        marketing_pct,
        budget_total,
        spent_total,
        sold_units_real_ytd,
        planned_cost_per_unit,
        current_real_cost_per_unit,
        remaining_units_plan,
        allowed_budget_so_far,
        over_under_so_far,
        remaining_budget_standard,
        remaining_budget_effective,
        remaining_cost_per_unit_effective,
        inventory: input.inventory,
        logical_units_for_plan,
        inventory_after_projection_units,
        inventory_after_projection_revenue,
        inventory_after_projection_budget,
        current_month,
    };

    (header, months_out)
}
