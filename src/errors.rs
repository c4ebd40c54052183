//! Unified error type for the production order service.
//!
//! Every fallible operation in the crate returns [`Result`], so validation failures
//! from the consumption calculator and data-service failures from `SeaORM` travel
//! through the same channel up to the caller.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or invalid free-text input
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Missing environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Order or component quantity was zero or negative
    #[error("Invalid quantity: {quantity} (must be greater than zero)")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// Consumption value was negative, NaN or infinite
    #[error("Invalid consumption value: {value}")]
    InvalidConsumption {
        /// The rejected consumption value
        value: f64,
    },

    /// Stock amount or adjustment was not a usable number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No order with this id or number
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Order id or order number that was looked up
        id: String,
    },

    /// No order component with this id
    #[error("Order component not found: {id}")]
    ComponentNotFound {
        /// Component id that was looked up
        id: i64,
    },

    /// No active material with this id or name
    #[error("Material not found: {name}")]
    MaterialNotFound {
        /// Material id or name that was looked up
        name: String,
    },

    /// Stock adjustment would take a material below zero
    #[error("Insufficient stock for '{material}': available {available}, required {required}")]
    InsufficientStock {
        /// Material name
        material: String,
        /// Stock currently on hand
        available: f64,
        /// Amount the adjustment tried to take out
        required: f64,
    },

    /// Order cannot move past its current production stage
    #[error("Cannot advance order {order_number} past stage '{stage}'")]
    InvalidStageTransition {
        /// Order number
        order_number: String,
        /// Stage the order is currently in
        stage: String,
    },

    /// Role lacks the permission required for an action
    #[error("Role '{role}' lacks permission '{permission}'")]
    PermissionDenied {
        /// Role name
        role: String,
        /// Permission name
        permission: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
