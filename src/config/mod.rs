/// Database configuration and connection management
pub mod database;

/// Inventory material seed configuration from config.toml
pub mod materials;
