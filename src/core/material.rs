//! Inventory material business logic.
//!
//! Materials are the raw stock order components consume. This module creates,
//! looks up and soft-deletes them, and adjusts stock levels atomically in the
//! database so concurrent receipts and issues cannot lose updates.

use crate::{
    entities::{Material, material},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Retrieves all active (non-deleted) materials, ordered alphabetically by name.
pub async fn get_all_active_materials(db: &DatabaseConnection) -> Result<Vec<material::Model>> {
    Material::find()
        .filter(material::Column::IsDeleted.eq(false))
        .order_by_asc(material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active material by name, returning None if not found or deleted.
pub async fn get_material_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<material::Model>> {
    Material::find()
        .filter(material::Column::Name.eq(name))
        .filter(material::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a material by name whether or not it is soft-deleted.
///
/// Names are unique across all rows, so this is the lookup to use before inserting.
pub async fn get_material_by_name_including_deleted(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<material::Model>> {
    Material::find()
        .filter(material::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a material by its unique ID, including soft-deleted ones.
pub async fn get_material_by_id<C>(db: &C, material_id: i64) -> Result<Option<material::Model>>
where
    C: ConnectionTrait,
{
    Material::find_by_id(material_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a material that must exist and be active.
pub(crate) async fn require_active_material<C>(db: &C, material_id: i64) -> Result<material::Model>
where
    C: ConnectionTrait,
{
    match get_material_by_id(db, material_id).await? {
        Some(m) if !m.is_deleted => Ok(m),
        _ => Err(Error::MaterialNotFound {
            name: material_id.to_string(),
        }),
    }
}

/// Active materials whose stock is at or below their reorder level.
pub async fn get_materials_below_reorder_level(
    db: &DatabaseConnection,
) -> Result<Vec<material::Model>> {
    Material::find()
        .filter(material::Column::IsDeleted.eq(false))
        .filter(Expr::col(material::Column::Stock).lte(Expr::col(material::Column::ReorderLevel)))
        .order_by_asc(material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new material, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name or unit is empty or whitespace-only
/// - The stock or reorder level is negative or not finite
/// - A material with the same name exists, including a soft-deleted one
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_material(
    db: &DatabaseConnection,
    name: String,
    unit: String,
    stock: f64,
    reorder_level: f64,
) -> Result<material::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Material name cannot be empty".to_string(),
        });
    }
    if unit.trim().is_empty() {
        return Err(Error::Config {
            message: "Material unit cannot be empty".to_string(),
        });
    }
    for amount in [stock, reorder_level] {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let name = name.trim().to_string();
    if get_material_by_name_including_deleted(db, &name)
        .await?
        .is_some()
    {
        return Err(Error::Config {
            message: format!("Material '{name}' already exists"),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let material = material::ActiveModel {
        name: Set(name),
        unit: Set(unit.trim().to_string()),
        stock: Set(stock),
        reorder_level: Set(reorder_level),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = material.insert(db).await?;
    info!("Created material '{}' (id {})", created.name, created.id);
    Ok(created)
}

/// Adds `delta` to a material's stock (negative to issue stock).
///
/// The update is a single `UPDATE materials SET stock = stock + delta` statement
/// guarded by `stock >= -delta`, so two concurrent issues cannot both succeed
/// against the same remaining stock.
///
/// # Errors
/// Returns an error if:
/// - `delta` is zero or not finite
/// - The material does not exist or is deleted
/// - The adjustment would take stock below zero
#[instrument(skip(db))]
pub async fn adjust_stock(
    db: &DatabaseConnection,
    material_id: i64,
    delta: f64,
) -> Result<material::Model> {
    if delta == 0.0 || !delta.is_finite() {
        return Err(Error::InvalidAmount { amount: delta });
    }

    let current = require_active_material(db, material_id).await?;

    let result = Material::update_many()
        .col_expr(
            material::Column::Stock,
            Expr::col(material::Column::Stock).add(delta),
        )
        .col_expr(
            material::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(material::Column::Id.eq(material_id))
        .filter(material::Column::IsDeleted.eq(false))
        .filter(material::Column::Stock.gte(-delta))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let latest = require_active_material(db, material_id).await?;
        return Err(Error::InsufficientStock {
            material: current.name,
            available: latest.stock,
            required: -delta,
        });
    }

    require_active_material(db, material_id).await
}

/// Soft deletes a material; components that reference it keep their history.
///
/// # Errors
/// Returns an error if the material does not exist or is already deleted.
#[instrument(skip(db))]
pub async fn delete_material(db: &DatabaseConnection, material_id: i64) -> Result<material::Model> {
    let mut material: material::ActiveModel = require_active_material(db, material_id).await?.into();
    material.is_deleted = Set(true);
    material.updated_at = Set(chrono::Utc::now().naive_utc());
    material.update(db).await.map_err(Into::into)
}
