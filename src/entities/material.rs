//! Material entity - Raw material held in inventory.
//!
//! Many order components may reference one material; the material does not know
//! about them beyond the relation. Materials are soft-deleted so historical
//! components keep a valid reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    /// Unique identifier for the material
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the material (e.g. "Non-woven 90 GSM")
    #[sea_orm(unique)]
    pub name: String,
    /// Unit stock and consumption are measured in (e.g. "m", "kg")
    pub unit: String,
    /// Quantity currently on hand
    pub stock: f64,
    /// Stock level at or below which the material should be reordered
    pub reorder_level: f64,
    /// Soft delete flag - if true, material is hidden but data is preserved
    pub is_deleted: bool,
    /// When the material was created
    pub created_at: DateTime,
    /// When the material was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Material and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One material is consumed by many order components
    #[sea_orm(has_many = "super::order_component::Entity")]
    Components,
}

impl Related<super::order_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
