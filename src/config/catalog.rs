//! Seed catalog loading from catalog.toml
//!
//! A fresh deployment starts with an empty products table; the catalog file
//! describes the initial machine load-out and is inserted once by the
//! bootstrap binary. Prices are written as strings in the file so they parse
//! as exact decimals.

use crate::core::product::{self, ProductInput};
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;

/// Structure representing the entire catalog.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Products to seed into an empty store
    pub products: Vec<CatalogProduct>,
}

/// One seed product entry
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogProduct {
    /// Display name
    pub name: String,
    /// Unit price, written as a string (e.g. `"1.500"`)
    pub price: Decimal,
    /// Initial stock level
    pub quantity: i32,
    /// Optional long-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional storefront image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Loads the seed catalog from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read, the TOML syntax is
/// invalid, or required fields are missing.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}

/// Loads the seed catalog from the default location (./catalog.toml).
pub fn load_default_catalog() -> Result<Catalog> {
    load_catalog("catalog.toml")
}

/// Inserts every catalog entry as an active product and returns how many
/// rows were created.
///
/// The caller decides whether seeding is appropriate (the bootstrap binary
/// only seeds an empty store).
pub async fn seed_products(db: &DatabaseConnection, catalog: &Catalog) -> Result<u64> {
    let mut inserted = 0;
    for entry in &catalog.products {
        product::create_product(
            db,
            ProductInput {
                name: entry.name.clone(),
                price: entry.price,
                quantity_available: entry.quantity,
                description: entry.description.clone(),
                image_url: entry.image_url.clone(),
                is_active: true,
            },
        )
        .await?;
        inserted += 1;
    }
    Ok(inserted)
}
