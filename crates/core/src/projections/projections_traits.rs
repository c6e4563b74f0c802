use async_trait::async_trait;

use crate::errors::Result;
use crate::projections::projections_model::{
    DefaultsUpsert, LineUpsert, NewProjection, PlanData, Projection, PropertyDefaults,
    ProjectionLine,
};

/// Trait for projection repository operations.
///
/// Reads are plain snapshot queries; writes go through the storage layer's
/// single-writer path.
#[async_trait]
pub trait ProjectionRepositoryTrait: Send + Sync {
    fn get_active_plan(&self) -> Result<Option<Projection>>;
    fn get_plan(&self, plan_id: &str) -> Result<Option<Projection>>;
    fn get_defaults(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<Option<PropertyDefaults>>;
    fn get_lines(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<Vec<ProjectionLine>>;
    fn list_defaults(&self, plan_id: &str, plan_variant: &str) -> Result<Vec<PropertyDefaults>>;

    async fn create(&self, new_plan: NewProjection) -> Result<Projection>;
    /// Creates a new plan copying the source plan's defaults and lines.
    async fn clone_plan(&self, source_id: String, new_plan: NewProjection) -> Result<Projection>;
    async fn set_locked(&self, plan_id: String, locked: bool) -> Result<Projection>;
    /// Activating a plan deactivates other plans of the same year in the
    /// same transaction.
    async fn set_active(&self, plan_id: String, active: bool) -> Result<Projection>;
    async fn upsert_defaults(&self, plan_id: String, entries: Vec<DefaultsUpsert>)
        -> Result<usize>;
    async fn upsert_lines(&self, plan_id: String, entries: Vec<LineUpsert>) -> Result<usize>;
}

/// Trait for projection service operations.
#[async_trait]
pub trait ProjectionServiceTrait: Send + Sync {
    /// The single plan used for live reporting. Fails with
    /// `ProjectionError::NoActivePlan` when none exists.
    fn active_plan(&self) -> Result<Projection>;
    fn load_plan_data(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<PlanData>;
    fn list_defaults(&self, plan_id: &str, plan_variant: &str) -> Result<Vec<PropertyDefaults>>;

    async fn create_plan(&self, new_plan: NewProjection) -> Result<Projection>;
    async fn clone_plan(&self, source_id: String, new_plan: NewProjection) -> Result<Projection>;
    async fn set_locked(&self, plan_id: String, locked: bool) -> Result<Projection>;
    async fn set_active(&self, plan_id: String, active: bool) -> Result<Projection>;
    async fn upsert_defaults(&self, plan_id: String, entries: Vec<DefaultsUpsert>)
        -> Result<usize>;
    async fn upsert_lines(&self, plan_id: String, entries: Vec<LineUpsert>) -> Result<usize>;
}
