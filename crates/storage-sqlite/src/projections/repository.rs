use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use brickplan_core::projections::{
    DefaultsUpsert, LineUpsert, NewProjection, Projection, ProjectionError, ProjectionLine,
    ProjectionRepositoryTrait, PropertyDefaults,
};
use brickplan_core::Result;

use super::model::{ProjectionDB, ProjectionLineDB, PropertyDefaultsDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{projection_defaults, projection_lines, projections};

pub struct ProjectionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProjectionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProjectionRepository { pool, writer }
    }

    fn load_plan(conn: &mut SqliteConnection, plan_id: &str) -> Result<Projection> {
        let plan_db = projections::table
            .find(plan_id)
            .first::<ProjectionDB>(conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| ProjectionError::NotFound(plan_id.to_string()))?;
        Ok(Projection::from(plan_db))
    }

    fn insert_plan(conn: &mut SqliteConnection, new_plan: NewProjection) -> Result<Projection> {
        let now = Utc::now().naive_utc();
        let plan_db = ProjectionDB {
            id: new_plan.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            year: new_plan.year,
            name: new_plan.name,
            is_locked: false,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        let result_db = diesel::insert_into(projections::table)
            .values(&plan_db)
            .returning(ProjectionDB::as_returning())
            .get_result(conn)
            .map_err(StorageError::from)?;
        Ok(Projection::from(result_db))
    }
}

#[async_trait]
impl ProjectionRepositoryTrait for ProjectionRepository {
    fn get_active_plan(&self) -> Result<Option<Projection>> {
        let mut conn = get_connection(&self.pool)?;
        let plan_db = projections::table
            .filter(projections::is_active.eq(true))
            .order(projections::updated_at.desc())
            .first::<ProjectionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(plan_db.map(Projection::from))
    }

    fn get_plan(&self, plan_id: &str) -> Result<Option<Projection>> {
        let mut conn = get_connection(&self.pool)?;
        let plan_db = projections::table
            .find(plan_id)
            .first::<ProjectionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(plan_db.map(Projection::from))
    }

    fn get_defaults(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<Option<PropertyDefaults>> {
        let mut conn = get_connection(&self.pool)?;
        let defaults_db = projection_defaults::table
            .filter(projection_defaults::projection_id.eq(plan_id))
            .filter(projection_defaults::property_key.eq(property_key))
            .filter(projection_defaults::plan_variant.eq(plan_variant))
            .first::<PropertyDefaultsDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(defaults_db.map(PropertyDefaults::from))
    }

    fn get_lines(
        &self,
        plan_id: &str,
        property_key: &str,
        plan_variant: &str,
    ) -> Result<Vec<ProjectionLine>> {
        let mut conn = get_connection(&self.pool)?;
        let lines_db = projection_lines::table
            .filter(projection_lines::projection_id.eq(plan_id))
            .filter(projection_lines::property_key.eq(property_key))
            .filter(projection_lines::plan_variant.eq(plan_variant))
            .order(projection_lines::year_month.asc())
            .load::<ProjectionLineDB>(&mut conn)
            .map_err(StorageError::from)?;
        lines_db.into_iter().map(ProjectionLine::try_from).collect()
    }

    fn list_defaults(&self, plan_id: &str, plan_variant: &str) -> Result<Vec<PropertyDefaults>> {
        let mut conn = get_connection(&self.pool)?;
        let defaults_db = projection_defaults::table
            .filter(projection_defaults::projection_id.eq(plan_id))
            .filter(projection_defaults::plan_variant.eq(plan_variant))
            .order(projection_defaults::property_key.asc())
            .load::<PropertyDefaultsDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(defaults_db.into_iter().map(PropertyDefaults::from).collect())
    }

    async fn create(&self, new_plan: NewProjection) -> Result<Projection> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| Self::insert_plan(conn, new_plan))
            .await
    }

    async fn clone_plan(&self, source_id: String, new_plan: NewProjection) -> Result<Projection> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Projection> {
                // Fails fast when the source does not exist.
                Self::load_plan(conn, &source_id)?;
                let plan = Self::insert_plan(conn, new_plan)?;

                let source_defaults = projection_defaults::table
                    .filter(projection_defaults::projection_id.eq(&source_id))
                    .load::<PropertyDefaultsDB>(conn)
                    .map_err(StorageError::from)?;
                for mut row in source_defaults {
                    row.id = Uuid::new_v4().to_string();
                    row.projection_id = plan.id.clone();
                    diesel::insert_into(projection_defaults::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                let source_lines = projection_lines::table
                    .filter(projection_lines::projection_id.eq(&source_id))
                    .load::<ProjectionLineDB>(conn)
                    .map_err(StorageError::from)?;
                for mut row in source_lines {
                    row.id = Uuid::new_v4().to_string();
                    row.projection_id = plan.id.clone();
                    diesel::insert_into(projection_lines::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                Ok(plan)
            })
            .await
    }

    async fn set_locked(&self, plan_id: String, locked: bool) -> Result<Projection> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Projection> {
                let affected = diesel::update(projections::table.find(&plan_id))
                    .set((
                        projections::is_locked.eq(locked),
                        projections::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(ProjectionError::NotFound(plan_id).into());
                }
                Self::load_plan(conn, &plan_id)
            })
            .await
    }

    async fn set_active(&self, plan_id: String, active: bool) -> Result<Projection> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Projection> {
                let plan = Self::load_plan(conn, &plan_id)?;
                let now = Utc::now().naive_utc();

                if active {
                    // Same-year siblings step down in the same transaction.
                    diesel::update(
                        projections::table
                            .filter(projections::year.eq(plan.year))
                            .filter(projections::id.ne(&plan_id))
                            .filter(projections::is_active.eq(true)),
                    )
                    .set((
                        projections::is_active.eq(false),
                        projections::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }

                diesel::update(projections::table.find(&plan_id))
                    .set((
                        projections::is_active.eq(active),
                        projections::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Self::load_plan(conn, &plan_id)
            })
            .await
    }

    async fn upsert_defaults(
        &self,
        plan_id: String,
        entries: Vec<DefaultsUpsert>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for entry in entries {
                    if entry.remove {
                        affected_rows += diesel::delete(
                            projection_defaults::table
                                .filter(projection_defaults::projection_id.eq(&plan_id))
                                .filter(projection_defaults::property_key.eq(&entry.property_key))
                                .filter(projection_defaults::plan_variant.eq(&entry.plan_variant)),
                        )
                        .execute(conn)
                        .map_err(StorageError::from)?;
                        continue;
                    }

                    let row = PropertyDefaultsDB {
                        id: Uuid::new_v4().to_string(),
                        projection_id: plan_id.clone(),
                        property_key: entry.property_key,
                        plan_variant: entry.plan_variant,
                        marketing_pct: entry.marketing_pct,
                        enterprise_name: entry.enterprise_name,
                        cost_center_id: entry.cost_center_id,
                        external_erp_id: entry.external_erp_id,
                        external_cv_id: entry.external_cv_id,
                    };
                    affected_rows += diesel::insert_into(projection_defaults::table)
                        .values(&row)
                        .on_conflict((
                            projection_defaults::projection_id,
                            projection_defaults::property_key,
                            projection_defaults::plan_variant,
                        ))
                        .do_update()
                        .set((
                            projection_defaults::marketing_pct.eq(&row.marketing_pct),
                            projection_defaults::enterprise_name.eq(&row.enterprise_name),
                            projection_defaults::cost_center_id.eq(&row.cost_center_id),
                            projection_defaults::external_erp_id.eq(&row.external_erp_id),
                            projection_defaults::external_cv_id.eq(&row.external_cv_id),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }

    async fn upsert_lines(&self, plan_id: String, entries: Vec<LineUpsert>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for entry in entries {
                    let row = ProjectionLineDB {
                        id: Uuid::new_v4().to_string(),
                        projection_id: plan_id.clone(),
                        property_key: entry.property_key,
                        plan_variant: entry.plan_variant,
                        year_month: entry.year_month.to_string(),
                        units_target: entry.units_target,
                        avg_price_target: entry.avg_price_target,
                        marketing_pct: entry.marketing_pct,
                    };
                    affected_rows += diesel::insert_into(projection_lines::table)
                        .values(&row)
                        .on_conflict((
                            projection_lines::projection_id,
                            projection_lines::property_key,
                            projection_lines::plan_variant,
                            projection_lines::year_month,
                        ))
                        .do_update()
                        .set((
                            projection_lines::units_target.eq(&row.units_target),
                            projection_lines::avg_price_target.eq(&row.avg_price_target),
                            projection_lines::marketing_pct.eq(&row.marketing_pct),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}
