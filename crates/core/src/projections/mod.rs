//! Projection plans - domain models, service, and repository traits.
//!
//! A projection is a yearly, versioned sales-and-marketing-budget target
//! set. Exactly one plan should be active per year; the viability engine
//! only reads plans, while the admin lifecycle (create, clone, lock,
//! activate, bulk upserts) writes them.

mod projections_model;
mod projections_service;
mod projections_traits;

pub use projections_model::{
    DefaultsUpsert, LineUpsert, NewProjection, PlanData, Projection, ProjectionError,
    ProjectionLine, PropertyDefaults,
};
pub use projections_service::ProjectionService;
pub use projections_traits::{ProjectionRepositoryTrait, ProjectionServiceTrait};
