//! Order component entity - One material usage within an ordered product.
//!
//! A component records which material a part of the bag (body, handle, ...) is
//! cut from and how much of it the order consumes. The per-unit base is stored
//! alongside the total so that quantity changes can be re-multiplied without
//! re-deriving the base from a stale total.

use sea_orm::{Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::core::consumption::ComponentConsumption;

/// Which part of the bag a component is.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase")]
pub enum ComponentType {
    /// Main bag body
    #[sea_orm(string_value = "body")]
    Body,
    /// Carry handle
    #[sea_orm(string_value = "handle")]
    Handle,
    /// Any other part (gusset, patch, ...)
    #[sea_orm(string_value = "part")]
    Part,
}

/// How the per-unit consumption of a component was obtained.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase")]
pub enum ConsumptionMode {
    /// Per-unit value comes from the product's catalog formula
    #[sea_orm(string_value = "formula")]
    Formula,
    /// Per-unit value was derived from a total typed in by the user
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Order component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_components")]
pub struct Model {
    /// Unique identifier for the component
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order this component belongs to
    pub order_id: i64,
    /// Inventory material the component consumes
    pub material_id: i64,
    /// Part of the bag this component represents
    pub component_type: ComponentType,
    /// Order quantity the total was last computed for
    pub quantity_basis: i64,
    /// Formula or manual entry
    pub consumption_mode: ConsumptionMode,
    /// Material consumed per bag
    pub base_consumption_per_unit: f64,
    /// Material consumed by the whole order line
    pub total_consumption: f64,
    /// When the component was created
    pub created_at: DateTime,
    /// When the component was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Consumption figures of this row as a calculator value.
    #[must_use]
    pub const fn consumption(&self) -> ComponentConsumption {
        ComponentConsumption {
            quantity_basis: self.quantity_basis,
            mode: self.consumption_mode,
            base_consumption_per_unit: self.base_consumption_per_unit,
            total_consumption: self.total_consumption,
        }
    }
}

impl ActiveModel {
    /// Copies calculator output into the active model's consumption columns.
    pub fn set_consumption(&mut self, consumption: &ComponentConsumption) {
        self.quantity_basis = Set(consumption.quantity_basis);
        self.consumption_mode = Set(consumption.mode);
        self.base_consumption_per_unit = Set(consumption.base_consumption_per_unit);
        self.total_consumption = Set(consumption.total_consumption);
    }
}

/// Defines relationships between `OrderComponent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each component belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each component consumes one material
    #[sea_orm(
        belongs_to = "super::material::Entity",
        from = "Column::MaterialId",
        to = "super::material::Column::Id"
    )]
    Material,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
