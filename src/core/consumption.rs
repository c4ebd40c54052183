//! Consumption calculation for order components.
//!
//! A component's material consumption is tracked as a per-unit base plus the total
//! for the quantity currently in effect. The base is fixed when the user selects a
//! catalog formula or types a manual total; quantity changes only re-multiply it.
//! The total is never divided by a new quantity to get a base back.
//!
//! Everything here is pure arithmetic on in-memory values. Persisting the result is
//! the caller's job (see [`crate::core::component`] and [`crate::core::order`]).

use crate::{
    entities::ConsumptionMode,
    errors::{Error, Result},
};

/// Consumption figures of one order component.
///
/// After any successful operation
/// `total_consumption == base_consumption_per_unit * quantity_basis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentConsumption {
    /// Order quantity the total was computed for
    pub quantity_basis: i64,
    /// Whether the base came from a formula or a manual entry
    pub mode: ConsumptionMode,
    /// Material consumed per unit of product
    pub base_consumption_per_unit: f64,
    /// Material consumed by `quantity_basis` units
    pub total_consumption: f64,
}

impl ComponentConsumption {
    /// Creates a formula-mode value with zero consumption at the given quantity.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] if `quantity_basis <= 0`.
    pub const fn new(quantity_basis: i64) -> Result<Self> {
        if quantity_basis <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: quantity_basis,
            });
        }
        Ok(Self {
            quantity_basis,
            mode: ConsumptionMode::Formula,
            base_consumption_per_unit: 0.0,
            total_consumption: 0.0,
        })
    }

    /// Records a total typed in by the user at `current_quantity`.
    ///
    /// The per-unit base becomes `entered_total / current_quantity` and the total is
    /// stored exactly as entered.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] if `current_quantity <= 0` and
    /// [`Error::InvalidConsumption`] if `entered_total` is negative or not finite.
    /// Nothing is modified on error.
    pub fn set_manual_consumption(
        &mut self,
        entered_total: f64,
        current_quantity: i64,
    ) -> Result<()> {
        validate_quantity(current_quantity)?;
        validate_consumption(entered_total)?;

        #[allow(clippy::cast_precision_loss)]
        let base = entered_total / current_quantity as f64;

        self.quantity_basis = current_quantity;
        self.mode = ConsumptionMode::Manual;
        self.base_consumption_per_unit = base;
        self.total_consumption = entered_total;
        Ok(())
    }

    /// Records a per-unit value produced by the product's catalog formula.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConsumption`] if `formula_result` is negative or not
    /// finite, and [`Error::InvalidQuantity`] if the current quantity basis is not
    /// positive. Nothing is modified on error.
    pub fn set_formula_consumption(&mut self, formula_result: f64) -> Result<()> {
        validate_consumption(formula_result)?;
        validate_quantity(self.quantity_basis)?;

        self.mode = ConsumptionMode::Formula;
        self.base_consumption_per_unit = formula_result;
        self.total_consumption = total_for(formula_result, self.quantity_basis);
        Ok(())
    }

    /// Re-multiplies the stored per-unit base by a new order quantity.
    ///
    /// The base and the mode are left untouched. Passing the quantity already in
    /// effect leaves the total as it is, so a manual total survives a no-op change
    /// bit for bit.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] if `new_quantity <= 0`. Nothing is
    /// modified on error.
    pub fn recalculate_for_quantity(&mut self, new_quantity: i64) -> Result<()> {
        validate_quantity(new_quantity)?;
        self.apply_quantity(new_quantity);
        Ok(())
    }

    fn apply_quantity(&mut self, new_quantity: i64) {
        if new_quantity == self.quantity_basis {
            return;
        }
        self.quantity_basis = new_quantity;
        self.total_consumption = total_for(self.base_consumption_per_unit, new_quantity);
    }
}

/// Recalculates every component of an order for a new order quantity in one pass.
///
/// The quantity is validated once up front, so either all components are updated
/// or none are.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if `new_quantity <= 0`.
pub fn recalculate_all(components: &mut [ComponentConsumption], new_quantity: i64) -> Result<()> {
    validate_quantity(new_quantity)?;
    for component in components.iter_mut() {
        component.apply_quantity(new_quantity);
    }
    Ok(())
}

/// Rejects quantities that are zero or negative.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if `quantity <= 0`.
pub const fn validate_quantity(quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

fn validate_consumption(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidConsumption { value });
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn total_for(base: f64, quantity: i64) -> f64 {
    base * quantity as f64
}
