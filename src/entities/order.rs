//! Order entity - A customer order for a quantity of one bag product.
//!
//! Each order moves through the production stages (cutting, printing, stitching)
//! until it is dispatched. An order owns its components; deleting the order
//! deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production stage an order is currently in, in processing order.
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
pub enum ProductionStage {
    /// Accepted, not yet in production
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Material is being cut
    #[sea_orm(string_value = "cutting")]
    Cutting,
    /// Cut pieces are being printed
    #[sea_orm(string_value = "printing")]
    Printing,
    /// Pieces are being stitched into bags
    #[sea_orm(string_value = "stitching")]
    Stitching,
    /// Finished goods have left the factory
    #[sea_orm(string_value = "dispatched")]
    Dispatched,
}

impl ProductionStage {
    /// The stage that follows this one, or `None` once dispatched.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Cutting),
            Self::Cutting => Some(Self::Printing),
            Self::Printing => Some(Self::Stitching),
            Self::Stitching => Some(Self::Dispatched),
            Self::Dispatched => None,
        }
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business-facing order number (e.g. "ORD-2024-001")
    #[sea_orm(unique)]
    pub order_number: String,
    /// Customer the bags are made for
    pub customer_name: String,
    /// Catalog product being manufactured
    pub product_name: String,
    /// Number of bags ordered
    pub quantity: i64,
    /// Current production stage
    pub stage: ProductionStage,
    /// When the order was created
    pub created_at: DateTime,
    /// When the order was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many components
    #[sea_orm(has_many = "super::order_component::Entity")]
    Components,
}

impl Related<super::order_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
