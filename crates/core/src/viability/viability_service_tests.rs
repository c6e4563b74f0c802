//! Unit tests for the viability service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::{Error, Result};
use crate::expenses::{ExpenseEntry, ExpenseRepositoryTrait};
use crate::inventory::{
    IdentityMappingRepositoryTrait, InventoryRepositoryTrait, UnitRecord,
};
use crate::periods::PeriodQuery;
use crate::projections::{
    DefaultsUpsert, LineUpsert, NewProjection, PlanData, Projection, ProjectionError,
    ProjectionLine, ProjectionServiceTrait, PropertyDefaults,
};
use crate::sales::{ContractSituation, SaleContract, SalesRepositoryTrait};

use super::{MonthStatus, ViabilityError, ViabilityQuery, ViabilityService, ViabilityServiceTrait};

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockProjectionService {
    plan: Option<Projection>,
    defaults: Vec<PropertyDefaults>,
    lines: Vec<ProjectionLine>,
}

#[async_trait]
impl ProjectionServiceTrait for MockProjectionService {
    fn active_plan(&self) -> Result<Projection> {
        self.plan
            .clone()
            .ok_or_else(|| ProjectionError::NoActivePlan.into())
    }

    fn load_plan_data(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<PlanData> {
        Ok(PlanData {
            defaults: self
                .defaults
                .iter()
                .find(|d| {
                    d.projection_id == plan_id
                        && d.property_key == property_key
                        && d.plan_variant == plan_variant
                })
                .cloned(),
            lines: self
                .lines
                .iter()
                .filter(|l| {
                    l.projection_id == plan_id
                        && l.property_key == property_key
                        && l.plan_variant == plan_variant
                })
                .cloned()
                .collect(),
        })
    }

    fn list_defaults(&self, plan_id: &str, plan_variant: &str) -> Result<Vec<PropertyDefaults>> {
        Ok(self
            .defaults
            .iter()
            .filter(|d| d.projection_id == plan_id && d.plan_variant == plan_variant)
            .cloned()
            .collect())
    }

    async fn create_plan(&self, _: NewProjection) -> Result<Projection> {
        unimplemented!()
    }

    async fn clone_plan(&self, _: String, _: NewProjection) -> Result<Projection> {
        unimplemented!()
    }

    async fn set_locked(&self, _: String, _: bool) -> Result<Projection> {
        unimplemented!()
    }

    async fn set_active(&self, _: String, _: bool) -> Result<Projection> {
        unimplemented!()
    }

    async fn upsert_defaults(&self, _: String, _: Vec<DefaultsUpsert>) -> Result<usize> {
        unimplemented!()
    }

    async fn upsert_lines(&self, _: String, _: Vec<LineUpsert>) -> Result<usize> {
        unimplemented!()
    }
}

struct MockExpenseRepository {
    entries: Vec<ExpenseEntry>,
    /// Cost centers whose queries fail, for abort-semantics tests.
    failing_cost_centers: Vec<i64>,
}

impl ExpenseRepositoryTrait for MockExpenseRepository {
    fn entries_in_range(
        &self,
        cost_center_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Vec<ExpenseEntry>> {
        if self.failing_cost_centers.contains(&cost_center_id) {
            return Err(Error::Repository(format!(
                "ledger unreachable for cost center {cost_center_id}"
            )));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                e.cost_center_id == cost_center_id
                    && e.competence_month >= start
                    && e.competence_month < end_exclusive
            })
            .cloned()
            .collect())
    }

    fn has_entries(&self, cost_center_id: i64) -> Result<bool> {
        Ok(self.entries.iter().any(|e| e.cost_center_id == cost_center_id)
            || self.failing_cost_centers.contains(&cost_center_id))
    }
}

struct MockSalesRepository {
    contracts: Vec<SaleContract>,
}

impl SalesRepositoryTrait for MockSalesRepository {
    fn contracts_in_range(
        &self,
        erp_property_id: i64,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        situations: &[ContractSituation],
    ) -> Result<Vec<SaleContract>> {
        Ok(self
            .contracts
            .iter()
            .filter(|c| {
                c.erp_property_id == erp_property_id
                    && c.reference_date >= start
                    && c.reference_date < end_exclusive
                    && situations.contains(&c.situation)
            })
            .cloned()
            .collect())
    }
}

struct MockIdentityRepository {
    mappings: HashMap<i64, i64>,
}

impl IdentityMappingRepositoryTrait for MockIdentityRepository {
    fn resolve_cv_id(&self, erp_id: i64) -> Result<Option<i64>> {
        Ok(self.mappings.get(&erp_id).copied())
    }
}

struct MockInventoryRepository {
    units_by_property: HashMap<i64, Vec<UnitRecord>>,
}

impl InventoryRepositoryTrait for MockInventoryRepository {
    fn units_for_property(&self, cv_id: i64) -> Result<Vec<UnitRecord>> {
        Ok(self
            .units_by_property
            .get(&cv_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn active_plan() -> Projection {
    Projection {
        id: "plan-2025".to_string(),
        year: 2025,
        name: "2025 baseline".to_string(),
        is_locked: false,
        is_active: true,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn property_defaults(
    property_key: &str,
    cost_center_id: Option<i64>,
    external_erp_id: Option<i64>,
    external_cv_id: Option<i64>,
) -> PropertyDefaults {
    PropertyDefaults {
        id: format!("d-{property_key}"),
        projection_id: "plan-2025".to_string(),
        property_key: property_key.to_string(),
        plan_variant: "default".to_string(),
        marketing_pct: 5.0,
        enterprise_name: Some(format!("{property_key} towers")),
        cost_center_id,
        external_erp_id,
        external_cv_id,
    }
}

fn plan_line(property_key: &str, month: &str, units: i32, price: f64) -> ProjectionLine {
    ProjectionLine {
        id: format!("l-{property_key}-{month}"),
        projection_id: "plan-2025".to_string(),
        property_key: property_key.to_string(),
        plan_variant: "default".to_string(),
        year_month: month.parse().unwrap(),
        units_target: units,
        avg_price_target: price,
        marketing_pct: None,
    }
}

fn expense(cost_center_id: i64, month: &str, amount: f64) -> ExpenseEntry {
    ExpenseEntry {
        id: format!("e-{cost_center_id}-{month}"),
        cost_center_id,
        competence_month: format!("{month}-01").parse().unwrap(),
        amount,
        description: "campaign".to_string(),
        department: Some("marketing".to_string()),
    }
}

fn sold_contract(id: &str, erp_property_id: i64, date: &str, units: &[&str]) -> SaleContract {
    SaleContract {
        id: id.to_string(),
        erp_property_id,
        situation: ContractSituation::Issued,
        reference_date: date.parse().unwrap(),
        units: units.iter().map(|u| u.to_string()).collect(),
    }
}

fn sold_unit(id: &str) -> UnitRecord {
    UnitRecord {
        id: id.to_string(),
        name: Some(id.to_string()),
        status: Some("3".to_string()),
        blocked_since: None,
    }
}

fn available_unit(id: &str) -> UnitRecord {
    UnitRecord {
        id: id.to_string(),
        name: Some(id.to_string()),
        status: Some("1".to_string()),
        blocked_since: None,
    }
}

struct ServiceFixture {
    plan: Option<Projection>,
    defaults: Vec<PropertyDefaults>,
    lines: Vec<ProjectionLine>,
    expenses: Vec<ExpenseEntry>,
    failing_cost_centers: Vec<i64>,
    contracts: Vec<SaleContract>,
    mappings: HashMap<i64, i64>,
    units_by_property: HashMap<i64, Vec<UnitRecord>>,
}

impl ServiceFixture {
    fn new() -> Self {
        ServiceFixture {
            plan: Some(active_plan()),
            defaults: Vec::new(),
            lines: Vec::new(),
            expenses: Vec::new(),
            failing_cost_centers: Vec::new(),
            contracts: Vec::new(),
            mappings: HashMap::new(),
            units_by_property: HashMap::new(),
        }
    }

    fn build(self) -> ViabilityService {
        ViabilityService::new(
            Arc::new(MockProjectionService {
                plan: self.plan,
                defaults: self.defaults,
                lines: self.lines,
            }),
            Arc::new(MockExpenseRepository {
                entries: self.expenses,
                failing_cost_centers: self.failing_cost_centers,
            }),
            Arc::new(MockSalesRepository {
                contracts: self.contracts,
            }),
            Arc::new(MockIdentityRepository {
                mappings: self.mappings,
            }),
            Arc::new(MockInventoryRepository {
                units_by_property: self.units_by_property,
            }),
        )
    }
}

fn query(property_key: &str) -> ViabilityQuery {
    ViabilityQuery {
        property_key: property_key.to_string(),
        plan_variant: None,
        period: PeriodQuery::Explicit {
            start_month: "2025-01".parse().unwrap(),
            end_month: "2025-03".parse().unwrap(),
        },
        external_erp_id: None,
        external_cv_id: None,
        cost_center_id: None,
    }
}

// ============================================================================
// Single-property computation
// ============================================================================

mod compute_tests {
    use super::*;

    #[test]
    fn rejects_missing_property_key() {
        let service = ServiceFixture::new().build();
        let err = service.compute(&query("  ")).unwrap_err();
        assert!(matches!(
            err,
            Error::Viability(ViabilityError::MissingPropertyKey)
        ));
    }

    #[test]
    fn fails_without_an_active_plan() {
        let mut fixture = ServiceFixture::new();
        fixture.plan = None;
        let service = fixture.build();
        let err = service.compute(&query("alpha")).unwrap_err();
        assert!(matches!(
            err,
            Error::Projection(ProjectionError::NoActivePlan)
        ));
    }

    #[test]
    fn combines_plan_actuals_and_inventory() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), Some(42), Some(9))];
        fixture.lines = vec![
            plan_line("alpha", "2025-01", 2, 200_000.0),
            plan_line("alpha", "2025-02", 2, 200_000.0),
            plan_line("alpha", "2025-03", 2, 200_000.0),
        ];
        fixture.expenses = vec![expense(7, "2025-01", 20_000.0)];
        fixture.contracts = vec![sold_contract("c1", 42, "2025-01-15", &["T1-101", "T1-102"])];
        fixture.units_by_property.insert(
            9,
            vec![
                sold_unit("u1"),
                sold_unit("u2"),
                available_unit("u3"),
                available_unit("u4"),
            ],
        );
        let service = fixture.build();

        let report = service.compute(&query("alpha")).unwrap();

        assert_eq!(report.plan_id, "plan-2025");
        assert_eq!(report.months.len(), 3);
        assert_eq!(report.header.units_target_total, 6);
        assert_eq!(report.header.budget_total, 60_000.0);
        assert_eq!(report.header.spent_total, 20_000.0);
        assert_eq!(report.header.sold_units_real_ytd, 2);
        assert_eq!(report.header.inventory.sold_units_stock, 2);
        assert_eq!(report.header.inventory.available_inventory, 2);
        // 2 in stock (not sold) + 2 sold = 4 logical units against 6 planned
        assert_eq!(report.header.logical_units_for_plan, 4);
        assert_eq!(report.header.inventory_after_projection_units, 0);

        // month 1 spent exactly its planned 20000
        assert_eq!(report.months[0].status, MonthStatus::OnTrack);
        assert_eq!(report.months[0].units_sold_real, 2);
        assert_eq!(report.months[0].raw.expenses.len(), 1);
        assert_eq!(report.months[0].raw.contracts.len(), 1);
    }

    #[test]
    fn no_erp_linkage_still_yields_a_valid_report() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), None, None)];
        fixture.lines = vec![
            plan_line("alpha", "2025-01", 2, 200_000.0),
            plan_line("alpha", "2025-02", 2, 200_000.0),
        ];
        fixture.expenses = vec![expense(7, "2025-01", 15_000.0)];
        let service = fixture.build();

        let report = service.compute(&query("alpha")).unwrap();

        assert_eq!(report.header.sold_units_real_ytd, 0);
        assert!(report.months.iter().all(|m| m.units_sold_real == 0));
        assert_eq!(report.header.inventory.total_units, 0);
        // the report is still driven by expenses vs plan
        assert_eq!(report.header.spent_total, 15_000.0);
        assert!(report.header.budget_total > 0.0);
    }

    #[test]
    fn cv_id_falls_back_to_the_identity_mapping() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), Some(42), None)];
        fixture.lines = vec![plan_line("alpha", "2025-01", 1, 100_000.0)];
        fixture.mappings.insert(42, 9);
        fixture
            .units_by_property
            .insert(9, vec![available_unit("u1"), sold_unit("u2")]);
        let service = fixture.build();

        let mut q = query("alpha");
        q.period = PeriodQuery::Explicit {
            start_month: "2025-01".parse().unwrap(),
            end_month: "2025-01".parse().unwrap(),
        };
        let report = service.compute(&q).unwrap();

        assert_eq!(report.header.inventory.total_units, 2);
        assert_eq!(report.header.inventory.sold_units_stock, 1);
    }

    #[test]
    fn explicit_ids_override_the_defaults_linkage() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), Some(42), None)];
        fixture.lines = vec![plan_line("alpha", "2025-01", 1, 100_000.0)];
        fixture.expenses = vec![expense(7, "2025-01", 500.0), expense(8, "2025-01", 900.0)];
        let service = fixture.build();

        let mut q = query("alpha");
        q.period = PeriodQuery::Explicit {
            start_month: "2025-01".parse().unwrap(),
            end_month: "2025-01".parse().unwrap(),
        };
        q.cost_center_id = Some(8);
        let report = service.compute(&q).unwrap();

        assert_eq!(report.header.spent_total, 900.0);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), None, None)];
        fixture.lines = vec![plan_line("alpha", "2025-01", 2, 200_000.0)];
        fixture.expenses = vec![expense(7, "2025-01", 30_000.0)];
        let service = fixture.build();

        let mut q = query("alpha");
        q.period = PeriodQuery::Explicit {
            start_month: "2025-01".parse().unwrap(),
            end_month: "2025-01".parse().unwrap(),
        };
        let report = service.compute(&q).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["propertyKey"], "alpha");
        assert_eq!(value["startMonth"], "2025-01");
        assert!(value["header"]["unitsTargetTotal"].is_number());
        assert!(value["header"]["budgetTotal"].is_number());
        assert!(value["header"]["currentMonth"]["monthRemaining"].is_number());
        let month = &value["months"][0];
        assert_eq!(month["yearMonth"], "2025-01");
        assert_eq!(month["status"], "OVER");
        assert!(month["raw"]["expenses"].is_array());
    }

    #[test]
    fn legacy_year_period_covers_january_through_cutoff() {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![property_defaults("alpha", Some(7), None, None)];
        fixture.lines = vec![plan_line("alpha", "2025-04", 3, 150_000.0)];
        let service = fixture.build();

        let mut q = query("alpha");
        q.period = PeriodQuery::ByYear {
            year: 2025,
            up_to_month: Some(6),
        };
        let report = service.compute(&q).unwrap();

        assert_eq!(report.months.len(), 6);
        assert_eq!(report.start_month, "2025-01".parse().unwrap());
        assert_eq!(report.end_month, "2025-06".parse().unwrap());
        assert_eq!(report.header.units_target_total, 3);
    }
}

// ============================================================================
// Listing
// ============================================================================

mod listing_tests {
    use super::*;

    fn listing_fixture() -> ServiceFixture {
        let mut fixture = ServiceFixture::new();
        fixture.defaults = vec![
            property_defaults("alpha", Some(7), Some(42), Some(9)),
            property_defaults("beta", Some(8), None, None),
            property_defaults("gamma", None, None, None),
        ];
        fixture.lines = vec![
            plan_line("alpha", "2025-01", 2, 200_000.0),
            plan_line("alpha", "2025-02", 2, 200_000.0),
            plan_line("beta", "2025-01", 1, 300_000.0),
        ];
        fixture.expenses = vec![
            expense(7, "2025-01", 10_000.0),
            expense(8, "2025-01", 4_000.0),
        ];
        fixture
    }

    fn period() -> PeriodQuery {
        PeriodQuery::Explicit {
            start_month: "2025-01".parse().unwrap(),
            end_month: "2025-02".parse().unwrap(),
        }
    }

    #[test]
    fn lists_only_properties_with_history_and_coverage() {
        let service = listing_fixture().build();
        let listing = service.list("default", &period()).unwrap();

        // gamma has no cost center (no expense history), so it is skipped
        assert_eq!(listing.count, 2);
        let keys: Vec<&str> = listing
            .results
            .iter()
            .map(|r| r.property_key.as_str())
            .collect();
        assert_eq!(keys, vec!["alpha", "beta"]);
    }

    #[test]
    fn skips_properties_without_window_coverage() {
        let mut fixture = listing_fixture();
        // move beta's only line out of the window
        fixture.lines.retain(|l| l.property_key != "beta");
        fixture
            .lines
            .push(plan_line("beta", "2025-06", 1, 300_000.0));
        let service = fixture.build();

        let listing = service.list("default", &period()).unwrap();
        assert_eq!(listing.count, 1);
        assert_eq!(listing.results[0].property_key, "alpha");
    }

    #[test]
    fn reports_resolved_external_ids() {
        let mut fixture = listing_fixture();
        // alpha's cv id comes from the identity mapping instead of defaults
        fixture.defaults[0].external_cv_id = None;
        fixture.mappings.insert(42, 99);
        let service = fixture.build();

        let listing = service.list("default", &period()).unwrap();
        let alpha = &listing.results[0];
        assert_eq!(alpha.external_erp_id, Some(42));
        assert_eq!(alpha.resolved_cv_id, Some(99));
        assert_eq!(alpha.cost_center_id, Some(7));
        assert_eq!(alpha.enterprise_name.as_deref(), Some("alpha towers"));
    }

    #[test]
    fn one_failing_property_aborts_the_whole_listing() {
        let mut fixture = listing_fixture();
        fixture.failing_cost_centers = vec![8];
        let service = fixture.build();

        let err = service.list("default", &period()).unwrap_err();
        assert!(matches!(err, Error::Repository(_)));
    }

    #[test]
    fn repeated_listing_is_served_from_cache() {
        let service = listing_fixture().build();
        let first = service.list("default", &period()).unwrap();
        let second = service.list("default", &period()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fails_without_an_active_plan() {
        let mut fixture = listing_fixture();
        fixture.plan = None;
        let service = fixture.build();
        let err = service.list("default", &period()).unwrap_err();
        assert!(matches!(
            err,
            Error::Projection(ProjectionError::NoActivePlan)
        ));
    }
}
