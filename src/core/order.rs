//! Order business logic - Handles order intake, quantity changes and stage tracking.
//!
//! Changing an order's quantity is the one operation that touches more than one row:
//! the order and every component attached to it are updated inside a single database
//! transaction, with component totals re-multiplied from their stored per-unit base.

use crate::{
    core::consumption::{self, ComponentConsumption},
    entities::{Order, OrderComponent, ProductionStage, order, order_component},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Result of changing an order's quantity.
#[derive(Debug, Clone)]
pub struct OrderQuantityUpdate {
    /// The order after the change
    pub order: order::Model,
    /// Every component of the order after recalculation
    pub components: Vec<order_component::Model>,
}

/// Retrieves an order by its unique ID.
pub async fn get_order_by_id<C>(db: &C, order_id: i64) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Finds an order by its business order number.
pub async fn get_order_by_number(
    db: &DatabaseConnection,
    order_number: &str,
) -> Result<Option<order::Model>> {
    Order::find()
        .filter(order::Column::OrderNumber.eq(order_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads an order that must exist.
pub(crate) async fn require_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })
}

/// Lists all orders, newest first.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the orders currently in one production stage, oldest first.
pub async fn list_orders_in_stage(
    db: &DatabaseConnection,
    stage: ProductionStage,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::Stage.eq(stage))
        .order_by_asc(order::Column::CreatedAt)
        .order_by_asc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new order in the `pending` stage.
///
/// # Errors
/// Returns an error if:
/// - The order number, customer name or product name is empty
/// - The quantity is zero or negative
/// - An order with the same number already exists
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_order(
    db: &DatabaseConnection,
    order_number: String,
    customer_name: String,
    product_name: String,
    quantity: i64,
) -> Result<order::Model> {
    for (field, value) in [
        ("Order number", &order_number),
        ("Customer name", &customer_name),
        ("Product name", &product_name),
    ] {
        if value.trim().is_empty() {
            return Err(Error::Config {
                message: format!("{field} cannot be empty"),
            });
        }
    }
    consumption::validate_quantity(quantity)?;

    let order_number = order_number.trim().to_string();
    if get_order_by_number(db, &order_number).await?.is_some() {
        return Err(Error::Config {
            message: format!("Order number '{order_number}' already exists"),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let order = order::ActiveModel {
        order_number: Set(order_number),
        customer_name: Set(customer_name.trim().to_string()),
        product_name: Set(product_name.trim().to_string()),
        quantity: Set(quantity),
        stage: Set(ProductionStage::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = order.insert(db).await?;
    info!(
        "Created order {} for {} x '{}'",
        created.order_number, created.quantity, created.product_name
    );
    Ok(created)
}

/// Changes an order's quantity and recalculates all of its components.
///
/// Each component keeps its per-unit base; only its quantity basis and total
/// change. The quantity is validated before anything is read or written, and the
/// order and component updates commit together.
///
/// # Errors
/// Returns an error if:
/// - `new_quantity` is zero or negative
/// - The order does not exist
/// - Any database operation fails (nothing is committed in that case)
#[instrument(skip(db))]
pub async fn update_order_quantity(
    db: &DatabaseConnection,
    order_id: i64,
    new_quantity: i64,
) -> Result<OrderQuantityUpdate> {
    consumption::validate_quantity(new_quantity)?;

    let txn = db.begin().await?;

    let order = require_order(&txn, order_id).await?;
    let components = OrderComponent::find()
        .filter(order_component::Column::OrderId.eq(order_id))
        .order_by_asc(order_component::Column::Id)
        .all(&txn)
        .await?;

    let mut figures: Vec<ComponentConsumption> = components
        .iter()
        .map(order_component::Model::consumption)
        .collect();
    consumption::recalculate_all(&mut figures, new_quantity)?;

    let now = chrono::Utc::now().naive_utc();
    let mut updated_components = Vec::with_capacity(components.len());
    for (component, recalculated) in components.into_iter().zip(&figures) {
        let mut active: order_component::ActiveModel = component.into();
        active.set_consumption(recalculated);
        active.updated_at = Set(now);
        updated_components.push(active.update(&txn).await?);
    }

    let old_quantity = order.quantity;
    let mut active_order: order::ActiveModel = order.into();
    active_order.quantity = Set(new_quantity);
    active_order.updated_at = Set(now);
    let order = active_order.update(&txn).await?;

    txn.commit().await?;

    info!(
        "Order {} quantity {} -> {}, {} components recalculated",
        order.order_number,
        old_quantity,
        new_quantity,
        updated_components.len()
    );
    Ok(OrderQuantityUpdate {
        order,
        components: updated_components,
    })
}

/// Moves an order to the next production stage.
///
/// # Errors
/// Returns an error if the order does not exist or is already dispatched.
#[instrument(skip(db))]
pub async fn advance_order_stage(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let order = require_order(db, order_id).await?;
    let Some(next) = order.stage.next() else {
        return Err(Error::InvalidStageTransition {
            order_number: order.order_number,
            stage: order.stage.to_string(),
        });
    };

    debug!("Order {} {} -> {}", order.order_number, order.stage, next);
    let mut active: order::ActiveModel = order.into();
    active.stage = Set(next);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Deletes an order together with all of its components.
///
/// Returns the number of components removed.
///
/// # Errors
/// Returns an error if the order does not exist or a database operation fails.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let order = require_order(&txn, order_id).await?;
    let removed = OrderComponent::delete_many()
        .filter(order_component::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?
        .rows_affected;
    Order::delete_by_id(order_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        "Deleted order {} and {} components",
        order.order_number, removed
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::component::{add_formula_component, add_manual_component, get_components_for_order},
        entities::{ComponentType, ConsumptionMode},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_order(
            &db,
            "  ".to_string(),
            "Acme".to_string(),
            "Tote".to_string(),
            10,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_order(
            &db,
            "ORD-1".to_string(),
            "Acme".to_string(),
            String::new(),
            10,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_order(
            &db,
            "ORD-1".to_string(),
            "Acme".to_string(),
            "Tote".to_string(),
            0,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: 0 }
        ));

        assert!(list_orders(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_duplicate_number() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-1").await?;

        let result = create_test_order(&db, "ORD-1").await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_find_order() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_custom_order(&db, "ORD-7", 250).await?;

        assert_eq!(order.quantity, 250);
        assert_eq!(order.stage, ProductionStage::Pending);

        let by_number = get_order_by_number(&db, "ORD-7").await?.unwrap();
        assert_eq!(by_number, order);
        let by_id = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(by_id, order);
        assert!(get_order_by_id(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_recalculates_manual_component() -> Result<()> {
        let (db, order, material) = setup_with_order_and_material().await?;
        assert_eq!(order.quantity, 3);

        let body =
            add_manual_component(&db, order.id, material.id, ComponentType::Body, 600.0).await?;
        assert_eq!(body.base_consumption_per_unit, 200.0);
        assert_eq!(body.total_consumption, 600.0);

        let update = update_order_quantity(&db, order.id, 6).await?;
        assert_eq!(update.order.quantity, 6);
        assert_eq!(update.components.len(), 1);

        let body = &update.components[0];
        assert_eq!(body.total_consumption, 1200.0);
        assert_eq!(body.base_consumption_per_unit, 200.0);
        assert_eq!(body.quantity_basis, 6);
        assert_eq!(body.consumption_mode, ConsumptionMode::Manual);

        // Persisted, not just returned
        let stored = get_components_for_order(&db, order.id).await?;
        assert_eq!(stored[0].total_consumption, 1200.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_recalculates_all_components() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_custom_order(&db, "ORD-9", 1).await?;
        let fabric = create_test_material(&db, "Fabric").await?;
        let webbing = create_test_material(&db, "Webbing").await?;

        add_formula_component(&db, order.id, fabric.id, ComponentType::Body, 5.0).await?;
        add_formula_component(&db, order.id, webbing.id, ComponentType::Handle, 1.5).await?;
        add_manual_component(&db, order.id, webbing.id, ComponentType::Part, 0.5).await?;

        let update = update_order_quantity(&db, order.id, 10).await?;
        let totals: Vec<f64> = update
            .components
            .iter()
            .map(|c| c.total_consumption)
            .collect();
        assert_eq!(totals, vec![50.0, 15.0, 5.0]);
        assert!(update.components.iter().all(|c| c.quantity_basis == 10));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_same_value_is_stable() -> Result<()> {
        let (db, order, material) = setup_with_order_and_material().await?;
        add_manual_component(&db, order.id, material.id, ComponentType::Body, 100.0).await?;

        let first = update_order_quantity(&db, order.id, 7).await?;
        let second = update_order_quantity(&db, order.id, 7).await?;
        assert_eq!(
            first.components[0].total_consumption,
            second.components[0].total_consumption
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_rejects_non_positive() -> Result<()> {
        let (db, order, material) = setup_with_order_and_material().await?;
        let body =
            add_manual_component(&db, order.id, material.id, ComponentType::Body, 600.0).await?;

        for bad in [0, -5] {
            let err = update_order_quantity(&db, order.id, bad).await.unwrap_err();
            assert!(matches!(err, Error::InvalidQuantity { .. }));
        }

        let unchanged_order = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(unchanged_order.quantity, 3);
        let stored = get_components_for_order(&db, order.id).await?;
        assert_eq!(stored[0], body);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_missing_order() -> Result<()> {
        let db = setup_test_db().await?;
        let err = update_order_quantity(&db, 42, 5).await.unwrap_err();
        assert!(matches!(err, Error::OrderNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_order_stage_through_production() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db, "ORD-1").await?;

        let mut stages = Vec::new();
        for _ in 0..4 {
            stages.push(advance_order_stage(&db, order.id).await?.stage);
        }
        assert_eq!(
            stages,
            vec![
                ProductionStage::Cutting,
                ProductionStage::Printing,
                ProductionStage::Stitching,
                ProductionStage::Dispatched,
            ]
        );

        let err = advance_order_stage(&db, order.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidStageTransition { ref stage, .. } if stage == "dispatched"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_in_stage() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_order(&db, "ORD-A").await?;
        let b = create_test_order(&db, "ORD-B").await?;
        advance_order_stage(&db, b.id).await?;

        let pending = list_orders_in_stage(&db, ProductionStage::Pending).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);

        let cutting = list_orders_in_stage(&db, ProductionStage::Cutting).await?;
        assert_eq!(cutting.len(), 1);
        assert_eq!(cutting[0].id, b.id);

        let all = list_orders(&db).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_order_removes_components() -> Result<()> {
        let (db, order, material) = setup_with_order_and_material().await?;
        add_manual_component(&db, order.id, material.id, ComponentType::Body, 60.0).await?;
        add_formula_component(&db, order.id, material.id, ComponentType::Handle, 2.0).await?;

        let removed = delete_order(&db, order.id).await?;
        assert_eq!(removed, 2);
        assert!(get_order_by_id(&db, order.id).await?.is_none());
        assert!(get_components_for_order(&db, order.id).await?.is_empty());

        // Material is not owned by the components
        assert!(
            crate::core::material::get_material_by_id(&db, material.id)
                .await?
                .is_some()
        );

        let err = delete_order(&db, order.id).await.unwrap_err();
        assert!(matches!(err, Error::OrderNotFound { .. }));
        Ok(())
    }
}
