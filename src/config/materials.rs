//! Inventory material seed configuration from config.toml
//!
//! The materials listed in config.toml are inserted into inventory on startup when
//! no material of the same name exists yet. Existing stock is never touched, and a
//! material that was soft-deleted stays deleted.

use crate::{
    core::material,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "BAG_PRODUCTION_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Materials to seed into inventory
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

/// Configuration for a single inventory material
#[derive(Debug, Deserialize, Clone)]
pub struct MaterialConfig {
    /// Name of the material
    pub name: String,
    /// Unit the material is measured in
    pub unit: String,
    /// Opening stock
    #[serde(default)]
    pub stock: f64,
    /// Reorder threshold
    #[serde(default)]
    pub reorder_level: f64,
}

/// Loads material configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the config file named by `BAG_PRODUCTION_CONFIG`, or `./config.toml`.
///
/// A missing file yields an empty configuration.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        debug!("No config file at {}, nothing to seed", path);
        return Ok(Config::default());
    }
    load_config(path)
}

/// Inserts every configured material that is not in inventory yet.
///
/// Returns the number of materials created.
pub async fn seed_materials(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;
    for entry in &config.materials {
        if material::get_material_by_name_including_deleted(db, entry.name.trim())
            .await?
            .is_some()
        {
            debug!("Material '{}' already present, skipping", entry.name);
            continue;
        }
        material::create_material(
            db,
            entry.name.clone(),
            entry.unit.clone(),
            entry.stock,
            entry.reorder_level,
        )
        .await?;
        created += 1;
    }
    info!("Seeded {} of {} configured materials", created, config.materials.len());
    Ok(created)
}
