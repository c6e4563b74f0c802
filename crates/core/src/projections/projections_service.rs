use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::{Result, ValidationError};
use crate::projections::projections_model::{
    DefaultsUpsert, LineUpsert, NewProjection, PlanData, Projection, ProjectionError,
    PropertyDefaults,
};
use crate::projections::projections_traits::{ProjectionRepositoryTrait, ProjectionServiceTrait};

pub struct ProjectionService {
    repository: Arc<dyn ProjectionRepositoryTrait>,
}

impl ProjectionService {
    pub fn new(repository: Arc<dyn ProjectionRepositoryTrait>) -> Self {
        ProjectionService { repository }
    }

    /// Edits are rejected once a plan is locked.
    fn ensure_unlocked(&self, plan_id: &str) -> Result<()> {
        let plan = self
            .repository
            .get_plan(plan_id)?
            .ok_or_else(|| ProjectionError::NotFound(plan_id.to_string()))?;
        if plan.is_locked {
            return Err(ProjectionError::PlanLocked(plan_id.to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectionServiceTrait for ProjectionService {
    fn active_plan(&self) -> Result<Projection> {
        self.repository
            .get_active_plan()?
            .ok_or_else(|| ProjectionError::NoActivePlan.into())
    }

    fn load_plan_data(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<PlanData> {
        let defaults = self
            .repository
            .get_defaults(plan_id, property_key, plan_variant)?;
        let lines = self
            .repository
            .get_lines(plan_id, property_key, plan_variant)?;
        debug!(
            "Loaded plan data for {}/{}: {} lines, defaults {}",
            property_key,
            plan_variant,
            lines.len(),
            if defaults.is_some() { "present" } else { "absent" }
        );
        Ok(PlanData { defaults, lines })
    }

    fn list_defaults(&self, plan_id: &str, plan_variant: &str) -> Result<Vec<PropertyDefaults>> {
        self.repository.list_defaults(plan_id, plan_variant)
    }

    async fn create_plan(&self, new_plan: NewProjection) -> Result<Projection> {
        self.repository.create(new_plan).await
    }

    async fn clone_plan(&self, source_id: String, new_plan: NewProjection) -> Result<Projection> {
        if self.repository.get_plan(&source_id)?.is_none() {
            return Err(ProjectionError::NotFound(source_id).into());
        }
        self.repository.clone_plan(source_id, new_plan).await
    }

    async fn set_locked(&self, plan_id: String, locked: bool) -> Result<Projection> {
        self.repository.set_locked(plan_id, locked).await
    }

    async fn set_active(&self, plan_id: String, active: bool) -> Result<Projection> {
        self.repository.set_active(plan_id, active).await
    }

    async fn upsert_defaults(
        &self,
        plan_id: String,
        entries: Vec<DefaultsUpsert>,
    ) -> Result<usize> {
        self.ensure_unlocked(&plan_id)?;
        for entry in &entries {
            if entry.property_key.is_empty() {
                return Err(ValidationError::MissingField("propertyKey".to_string()).into());
            }
            if entry.marketing_pct < 0.0 {
                return Err(ValidationError::InvalidInput(format!(
                    "negative marketing percentage for '{}'",
                    entry.property_key
                ))
                .into());
            }
        }
        self.repository.upsert_defaults(plan_id, entries).await
    }

    async fn upsert_lines(&self, plan_id: String, entries: Vec<LineUpsert>) -> Result<usize> {
        self.ensure_unlocked(&plan_id)?;
        for entry in &entries {
            if entry.units_target < 0 {
                return Err(ValidationError::InvalidInput(format!(
                    "negative units target for '{}' {}",
                    entry.property_key, entry.year_month
                ))
                .into());
            }
            if entry.avg_price_target < 0.0 {
                return Err(ValidationError::InvalidInput(format!(
                    "negative price target for '{}' {}",
                    entry.property_key, entry.year_month
                ))
                .into());
            }
        }
        self.repository.upsert_lines(plan_id, entries).await
    }
}
