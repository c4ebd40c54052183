//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities are the records the data service stores: orders, their
//! components, and the inventory materials components consume.

pub mod material;
pub mod order;
pub mod order_component;

// Re-export specific types to avoid conflicts
pub use material::{Column as MaterialColumn, Entity as Material, Model as MaterialModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, ProductionStage};
pub use order_component::{
    Column as OrderComponentColumn, ComponentType, ConsumptionMode, Entity as OrderComponent,
    Model as OrderComponentModel,
};
