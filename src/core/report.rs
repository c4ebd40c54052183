//! Report generation business logic.
//!
//! Dashboards aggregate rows for display: how much of each material an order
//! needs against what is in stock, and how many orders sit in each production
//! stage. All functions return structured data; formatting is left to the caller.

use crate::{
    core::order::require_order,
    entities::{Material, Order, OrderComponent, ProductionStage, order, order_component},
    errors::Result,
};
use sea_orm::{Iterable, PaginatorTrait, prelude::*};
use std::collections::BTreeMap;
use tracing::warn;

/// Material demand of one order for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRequirement {
    /// Material id
    pub material_id: i64,
    /// Material name
    pub material_name: String,
    /// Unit the quantities are measured in
    pub unit: String,
    /// Sum of the order's component totals for this material
    pub required: f64,
    /// Stock currently on hand
    pub available: f64,
    /// How much is missing (zero when stock covers the requirement)
    pub shortfall: f64,
}

/// Number of orders in one production stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCount {
    /// The stage
    pub stage: ProductionStage,
    /// Orders currently in it
    pub count: u64,
}

/// Sums an order's component consumption per material and compares it with stock.
///
/// Results are sorted by material name.
///
/// # Errors
/// Returns an error if the order does not exist or a query fails.
pub async fn material_requirements(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<MaterialRequirement>> {
    require_order(db, order_id).await?;

    let rows = OrderComponent::find()
        .filter(order_component::Column::OrderId.eq(order_id))
        .find_also_related(Material)
        .all(db)
        .await?;

    let mut by_material: BTreeMap<i64, MaterialRequirement> = BTreeMap::new();
    for (component, material) in rows {
        let Some(material) = material else {
            warn!(
                "Component {} references missing material {}",
                component.id,
                component.material_id
            );
            continue;
        };
        by_material
            .entry(material.id)
            .or_insert_with(|| MaterialRequirement {
                material_id: material.id,
                material_name: material.name.clone(),
                unit: material.unit.clone(),
                required: 0.0,
                available: material.stock,
                shortfall: 0.0,
            })
            .required += component.total_consumption;
    }

    let mut requirements: Vec<MaterialRequirement> = by_material
        .into_values()
        .map(|mut r| {
            r.shortfall = (r.required - r.available).max(0.0);
            r
        })
        .collect();
    requirements.sort_by(|a, b| a.material_name.cmp(&b.material_name));
    Ok(requirements)
}

/// Counts orders per production stage, every stage included, in stage order.
pub async fn stage_summary(db: &DatabaseConnection) -> Result<Vec<StageCount>> {
    let mut summary = Vec::new();
    for stage in ProductionStage::iter() {
        let count = Order::find()
            .filter(order::Column::Stage.eq(stage))
            .count(db)
            .await?;
        summary.push(StageCount { stage, count });
    }
    Ok(summary)
}
