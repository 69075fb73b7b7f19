//! Database bootstrap for `vendo`.
//!
//! Provisions the store the web frontends run against: connects with the
//! configured pool settings, creates the schema from the entity definitions,
//! and seeds the product catalog from `catalog.toml` when the store is empty.

use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vendo::config::{catalog, database};
use vendo::core::product;
use vendo::errors::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Resolve database settings and connect
    let settings = database::DatabaseSettings::from_env()?;
    let db = database::connect(&settings)
        .await
        .inspect(|_| info!(url = %settings.url, "Connected to database."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    // 4. Create tables from the entity definitions
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed the catalog, but only into an empty store
    let existing = product::count_products(&db, false).await?;
    if existing == 0 {
        match catalog::load_default_catalog() {
            Ok(seed) => {
                let inserted = catalog::seed_products(&db, &seed).await?;
                info!(inserted, "Seeded product catalog.");
            }
            Err(e) => {
                warn!("No seed catalog loaded, starting with an empty store: {e}");
            }
        }
    } else {
        info!(existing, "Products already present, skipping catalog seed.");
    }

    info!("Vending database ready.");
    Ok(())
}
