//! Order component business logic.
//!
//! Components are created when a line is added to an order and updated whenever
//! the user enters a manual consumption or picks a catalog formula. The
//! calculator runs on the in-memory figures first; the row is only written once
//! the new figures are known to be valid.

use crate::{
    core::{
        consumption::ComponentConsumption,
        material::require_active_material,
        order::require_order,
    },
    entities::{ComponentType, OrderComponent, order_component},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Retrieves a component by its unique ID.
pub async fn get_component_by_id(
    db: &DatabaseConnection,
    component_id: i64,
) -> Result<Option<order_component::Model>> {
    OrderComponent::find_by_id(component_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_component(
    db: &DatabaseConnection,
    component_id: i64,
) -> Result<order_component::Model> {
    get_component_by_id(db, component_id)
        .await?
        .ok_or(Error::ComponentNotFound { id: component_id })
}

/// Retrieves all components of an order in the order they were added.
pub async fn get_components_for_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_component::Model>> {
    OrderComponent::find()
        .filter(order_component::Column::OrderId.eq(order_id))
        .order_by_asc(order_component::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a component whose per-unit consumption comes from the catalog formula.
///
/// # Errors
/// Returns an error if the order or material does not exist, the formula result is
/// negative or not finite, or the insert fails.
#[instrument(skip(db))]
pub async fn add_formula_component(
    db: &DatabaseConnection,
    order_id: i64,
    material_id: i64,
    component_type: ComponentType,
    per_unit: f64,
) -> Result<order_component::Model> {
    let order = require_order(db, order_id).await?;
    require_active_material(db, material_id).await?;

    let mut figures = ComponentConsumption::new(order.quantity)?;
    figures.set_formula_consumption(per_unit)?;

    insert_component(db, order_id, material_id, component_type, &figures).await
}

/// Adds a component from a total the user typed in for the order's current
/// quantity.
///
/// # Errors
/// Returns an error if the order or material does not exist, the entered total is
/// negative or not finite, or the insert fails.
#[instrument(skip(db))]
pub async fn add_manual_component(
    db: &DatabaseConnection,
    order_id: i64,
    material_id: i64,
    component_type: ComponentType,
    entered_total: f64,
) -> Result<order_component::Model> {
    let order = require_order(db, order_id).await?;
    require_active_material(db, material_id).await?;

    let mut figures = ComponentConsumption::new(order.quantity)?;
    figures.set_manual_consumption(entered_total, order.quantity)?;

    insert_component(db, order_id, material_id, component_type, &figures).await
}

async fn insert_component(
    db: &DatabaseConnection,
    order_id: i64,
    material_id: i64,
    component_type: ComponentType,
    figures: &ComponentConsumption,
) -> Result<order_component::Model> {
    let now = chrono::Utc::now().naive_utc();
    let mut component = order_component::ActiveModel {
        order_id: Set(order_id),
        material_id: Set(material_id),
        component_type: Set(component_type),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    component.set_consumption(figures);

    let created = component.insert(db).await?;
    debug!(
        "Added {} component {} to order {}: {} per unit, {} total",
        created.component_type,
        created.id,
        order_id,
        created.base_consumption_per_unit,
        created.total_consumption
    );
    Ok(created)
}

/// Replaces a component's consumption with a manually entered total for the
/// parent order's current quantity.
///
/// # Errors
/// Returns an error if the component or its order does not exist, the entered
/// total is negative or not finite, or the update fails. The stored row is left
/// unchanged on validation errors.
#[instrument(skip(db))]
pub async fn apply_manual_consumption(
    db: &DatabaseConnection,
    component_id: i64,
    entered_total: f64,
) -> Result<order_component::Model> {
    let component = require_component(db, component_id).await?;
    let order = require_order(db, component.order_id).await?;

    let mut figures = component.consumption();
    figures.set_manual_consumption(entered_total, order.quantity)?;

    save_consumption(db, component, &figures).await
}

/// Replaces a component's consumption with a catalog formula's per-unit value.
///
/// # Errors
/// Returns an error if the component or its order does not exist, the formula
/// result is negative or not finite, or the update fails. The stored row is left
/// unchanged on validation errors.
#[instrument(skip(db))]
pub async fn apply_formula_consumption(
    db: &DatabaseConnection,
    component_id: i64,
    per_unit: f64,
) -> Result<order_component::Model> {
    let component = require_component(db, component_id).await?;
    let order = require_order(db, component.order_id).await?;

    let mut figures = component.consumption();
    figures.recalculate_for_quantity(order.quantity)?;
    figures.set_formula_consumption(per_unit)?;

    save_consumption(db, component, &figures).await
}

async fn save_consumption(
    db: &DatabaseConnection,
    component: order_component::Model,
    figures: &ComponentConsumption,
) -> Result<order_component::Model> {
    let mut active: order_component::ActiveModel = component.into();
    active.set_consumption(figures);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Removes a single component from its order.
///
/// # Errors
/// Returns an error if the component does not exist or the delete fails.
#[instrument(skip(db))]
pub async fn delete_component(db: &DatabaseConnection, component_id: i64) -> Result<()> {
    let result = OrderComponent::delete_by_id(component_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ComponentNotFound { id: component_id });
    }
    Ok(())
}
