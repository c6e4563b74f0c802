//! Inventory classification and cross-system identity resolution.
//!
//! A property is known by an ERP cost-center id, a CRM internal id, and a
//! human property key; the identity mapping table, populated by an external
//! sync, associates them. This module only reads it.

mod classifier;
mod inventory_model;
mod inventory_service;
mod inventory_traits;

pub use classifier::classify_unit_status;
pub use inventory_model::{IdentityMapping, InventorySummary, UnitCondition, UnitRecord};
pub use inventory_service::{summarize_units, InventoryResolver};
pub use inventory_traits::{IdentityMappingRepositoryTrait, InventoryRepositoryTrait};
