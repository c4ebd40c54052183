//! Core business logic - framework-agnostic order, component, inventory and
//! reporting operations. Functions that need the data service take the
//! connection as an argument.

/// Order component operations
pub mod component;
/// Per-unit and total material consumption calculation
pub mod consumption;
/// Inventory material operations
pub mod material;
/// Order intake, quantity changes and stage tracking
pub mod order;
/// Role-based permission table
pub mod permissions;
/// Dashboard aggregates
pub mod report;
