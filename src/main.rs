//! Service bootstrap: sets up logging and configuration, connects to the data
//! service, ensures the tables exist and seeds inventory materials.

use bag_production::{
    config::{database, materials},
    core::{material, report},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    if dotenv().is_err() {
        info!("No .env file loaded, using process environment");
    }

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed inventory from config.toml
    let config = materials::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    materials::seed_materials(&db, &config).await?;

    // 5. Startup summary
    for stage in report::stage_summary(&db).await? {
        info!("{} orders in stage '{}'", stage.count, stage.stage);
    }
    for low in material::get_materials_below_reorder_level(&db).await? {
        warn!(
            "Material '{}' is low: {} {} on hand (reorder at {})",
            low.name, low.stock, low.unit, low.reorder_level
        );
    }

    info!("Production order service ready");
    Ok(())
}
