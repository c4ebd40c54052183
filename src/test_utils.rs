//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{material, order},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test material with sensible defaults.
///
/// # Defaults
/// * `unit`: "m"
/// * `stock`: 1000.0
/// * `reorder_level`: 100.0
pub async fn create_test_material(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::material::Model> {
    create_custom_material(db, name, 1000.0, 100.0).await
}

/// Creates a test material with custom stock levels.
pub async fn create_custom_material(
    db: &DatabaseConnection,
    name: &str,
    stock: f64,
    reorder_level: f64,
) -> Result<entities::material::Model> {
    material::create_material(
        db,
        name.to_string(),
        "m".to_string(),
        stock,
        reorder_level,
    )
    .await
}

/// Creates a test order for 3 tote bags.
pub async fn create_test_order(
    db: &DatabaseConnection,
    order_number: &str,
) -> Result<entities::order::Model> {
    create_custom_order(db, order_number, 3).await
}

/// Creates a test order with a custom quantity.
pub async fn create_custom_order(
    db: &DatabaseConnection,
    order_number: &str,
    quantity: i64,
) -> Result<entities::order::Model> {
    order::create_order(
        db,
        order_number.to_string(),
        "Test Customer".to_string(),
        "Tote Bag".to_string(),
        quantity,
    )
    .await
}

/// Sets up a complete test environment with an order (quantity 3) and a material.
/// Returns (db, order, material) for component-related tests.
pub async fn setup_with_order_and_material() -> Result<(
    DatabaseConnection,
    entities::order::Model,
    entities::material::Model,
)> {
    let db = setup_test_db().await?;
    let order = create_test_order(&db, "ORD-TEST").await?;
    let material = create_test_material(&db, "Test Fabric").await?;
    Ok((db, order, material))
}
