use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::{debug, warn};

use crate::constants::{DEFAULT_PLAN_VARIANT, LISTING_CACHE_TTL_SECS};
use crate::errors::Result;
use crate::expenses::{ExpenseAggregator, ExpenseRepositoryTrait};
use crate::inventory::{
    IdentityMappingRepositoryTrait, InventoryRepositoryTrait, InventoryResolver,
};
use crate::periods::{PeriodQuery, ResolvedPeriod};
use crate::projections::{PlanData, Projection, ProjectionServiceTrait, PropertyDefaults};
use crate::sales::{SalesAggregator, SalesRepositoryTrait};

use super::calculator::{self, CalculatorInput};
use super::viability_model::{
    ViabilityError, ViabilityHeader, ViabilityListItem, ViabilityListing, ViabilityMonth,
    ViabilityQuery, ViabilityReport,
};

/// Trait for viability report operations.
pub trait ViabilityServiceTrait: Send + Sync {
    /// Computes the single-property viability report.
    fn compute(&self, query: &ViabilityQuery) -> Result<ViabilityReport>;

    /// Repeats the computation across every property with a live plan in
    /// the given variant.
    fn list(&self, plan_variant: &str, period: &PeriodQuery) -> Result<ViabilityListing>;
}

/// External ids in effect for one computation, after filling the gaps from
/// the plan defaults and the identity mapping.
struct ResolvedLinkage {
    cost_center_id: Option<i64>,
    erp_id: Option<i64>,
    cv_id: Option<i64>,
}

pub struct ViabilityService {
    projections: Arc<dyn ProjectionServiceTrait>,
    expenses: ExpenseAggregator,
    sales: SalesAggregator,
    inventory: InventoryResolver,
    // read-through cache on the listing; correctness never depends on it
    listing_cache: DashMap<String, (Instant, ViabilityListing)>,
}

impl ViabilityService {
    pub fn new(
        projections: Arc<dyn ProjectionServiceTrait>,
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
        sales_repository: Arc<dyn SalesRepositoryTrait>,
        identity_repository: Arc<dyn IdentityMappingRepositoryTrait>,
        inventory_repository: Arc<dyn InventoryRepositoryTrait>,
    ) -> Self {
        ViabilityService {
            projections,
            expenses: ExpenseAggregator::new(expense_repository),
            sales: SalesAggregator::new(sales_repository),
            inventory: InventoryResolver::new(identity_repository, inventory_repository),
            listing_cache: DashMap::new(),
        }
    }

    /// Fills unspecified external ids from the plan defaults; the CV id
    /// additionally falls back to the identity mapping for the ERP id. An
    /// unresolved id is not an error, the matching aggregate just reads
    /// zero.
    fn resolve_linkage(
        &self,
        defaults: Option<&PropertyDefaults>,
        cost_center_id: Option<i64>,
        erp_id: Option<i64>,
        cv_id: Option<i64>,
    ) -> Result<ResolvedLinkage> {
        let cost_center_id = cost_center_id.or_else(|| defaults.and_then(|d| d.cost_center_id));
        let erp_id = erp_id.or_else(|| defaults.and_then(|d| d.external_erp_id));
        let mut cv_id = cv_id.or_else(|| defaults.and_then(|d| d.external_cv_id));
        if cv_id.is_none() {
            if let Some(erp) = erp_id {
                cv_id = self.inventory.resolve_cv_id(erp)?;
                if cv_id.is_none() {
                    warn!("No CRM mapping for ERP id {erp}; inventory figures will be zero");
                }
            }
        }
        Ok(ResolvedLinkage {
            cost_center_id,
            erp_id,
            cv_id,
        })
    }

    fn compute_for_plan(
        &self,
        plan: &Projection,
        plan_data: &PlanData,
        period: &ResolvedPeriod,
        linkage: &ResolvedLinkage,
    ) -> Result<(ViabilityHeader, Vec<ViabilityMonth>)> {
        let expense_map = self.expenses.sum_by_month(linkage.cost_center_id, period)?;
        let sales_map = self.sales.count_units_by_month(linkage.erp_id, period)?;
        let inventory = self.inventory.summarize(linkage.cv_id)?;

        debug!(
            "Computing viability for plan {} over {} months",
            plan.id,
            period.months.len()
        );

        Ok(calculator::compute(CalculatorInput {
            months: &period.months,
            lines: &plan_data.lines,
            defaults: plan_data.defaults.as_ref(),
            expenses: &expense_map,
            sales: &sales_map,
            inventory,
        }))
    }

    /// Window unit-target total straight from the plan lines; used by the
    /// listing skip rule before any aggregation runs.
    fn window_target_total(plan_data: &PlanData, period: &ResolvedPeriod) -> i32 {
        plan_data
            .lines
            .iter()
            .filter(|l| period.contains(l.year_month))
            .map(|l| l.units_target.max(0))
            .sum()
    }
}

impl ViabilityServiceTrait for ViabilityService {
    fn compute(&self, query: &ViabilityQuery) -> Result<ViabilityReport> {
        if query.property_key.trim().is_empty() {
            return Err(ViabilityError::MissingPropertyKey.into());
        }
        let period = query.period.resolve()?;
        let plan = self.projections.active_plan()?;
        let plan_variant = query
            .plan_variant
            .clone()
            .unwrap_or_else(|| DEFAULT_PLAN_VARIANT.to_string());
        let plan_data =
            self.projections
                .load_plan_data(&plan.id, &query.property_key, &plan_variant)?;

        let linkage = self.resolve_linkage(
            plan_data.defaults.as_ref(),
            query.cost_center_id,
            query.external_erp_id,
            query.external_cv_id,
        )?;

        let (header, months) = self.compute_for_plan(&plan, &plan_data, &period, &linkage)?;

        Ok(ViabilityReport {
            property_key: query.property_key.clone(),
            plan_id: plan.id,
            plan_variant,
            start_month: period.start_month(),
            end_month: period.end_month(),
            header,
            months,
        })
    }

    fn list(&self, plan_variant: &str, period: &PeriodQuery) -> Result<ViabilityListing> {
        let resolved = period.resolve()?;
        let cache_key = format!(
            "{plan_variant}|{}|{}",
            resolved.start_month(),
            resolved.end_month()
        );
        if let Some(entry) = self.listing_cache.get(&cache_key) {
            let (cached_at, listing) = entry.value();
            if cached_at.elapsed() < Duration::from_secs(LISTING_CACHE_TTL_SECS) {
                debug!("Serving viability listing from cache: {cache_key}");
                return Ok(listing.clone());
            }
        }

        let plan = self.projections.active_plan()?;
        let defaults_rows = self.projections.list_defaults(&plan.id, plan_variant)?;

        let mut results = Vec::new();
        for row in defaults_rows {
            // No expense history means nothing to reconcile yet.
            if !self.expenses.has_history(row.cost_center_id)? {
                debug!(
                    "Skipping '{}': no expense history for cost center {:?}",
                    row.property_key, row.cost_center_id
                );
                continue;
            }

            let plan_data =
                self.projections
                    .load_plan_data(&plan.id, &row.property_key, plan_variant)?;

            // No projection coverage for this window.
            if Self::window_target_total(&plan_data, &resolved) == 0 {
                debug!("Skipping '{}': no unit targets in window", row.property_key);
                continue;
            }

            let linkage = self.resolve_linkage(
                plan_data.defaults.as_ref(),
                row.cost_center_id,
                row.external_erp_id,
                row.external_cv_id,
            )?;

            // A failure here aborts the whole listing; a partial report
            // would be misleadingly confident.
            let (header, _) = self.compute_for_plan(&plan, &plan_data, &resolved, &linkage)?;

            results.push(ViabilityListItem {
                property_key: row.property_key,
                external_erp_id: linkage.erp_id,
                resolved_cv_id: linkage.cv_id,
                cost_center_id: linkage.cost_center_id,
                enterprise_name: row.enterprise_name,
                header,
            });
        }

        let listing = ViabilityListing {
            plan_id: plan.id,
            plan_variant: plan_variant.to_string(),
            start_month: resolved.start_month(),
            end_month: resolved.end_month(),
            count: results.len(),
            results,
        };
        self.listing_cache
            .insert(cache_key, (Instant::now(), listing.clone()));
        Ok(listing)
    }
}
