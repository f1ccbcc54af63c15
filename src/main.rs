use dotenvy::dotenv;
use shopkeep::{
    config::{database, seed},
    core::supplier,
    errors::Result,
};
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

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 4. Seed suppliers from config.toml, if present
    let path = seed::config_path();
    match seed::load_config(&path) {
        Ok(config) => {
            supplier::seed_suppliers(&db, &config.suppliers)
                .await
                .inspect_err(|e| error!("Failed to seed suppliers: {}", e))?;
        }
        Err(e) => warn!("Skipping supplier seeding from {}: {}", path, e),
    }

    let suppliers = supplier::list_suppliers(&db).await?;
    info!("Commerce core ready with {} suppliers.", suppliers.len());

    Ok(())
}
