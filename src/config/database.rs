//! Database configuration module for `vendo`.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Settings come from the environment (`DATABASE_URL` plus pool knobs) and the
//! schema is generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the tables always match the Rust
//! structs without hand-written SQL.
//!
//! The pool timeouts are deliberately part of the public settings: a purchase
//! blocked on a busy database must fail within a bounded wait instead of
//! hanging a storefront request forever.

use crate::entities::{Product, Transaction, User};
use crate::errors::{Error, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;

const DEFAULT_URL: &str = "sqlite://data/vendo.sqlite";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 8;

/// Connection settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Database URL (`DATABASE_URL`, defaults to a local `SQLite` file)
    pub url: String,
    /// Pool size (`VENDO_MAX_CONNECTIONS`)
    pub max_connections: u32,
    /// Bound on establishing a new connection (`VENDO_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout: Duration,
    /// Bound on waiting for a pooled connection, which is also the longest a
    /// purchase can sit behind other writers (`VENDO_ACQUIRE_TIMEOUT_SECS`)
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    /// Reads settings from the environment, falling back to defaults for
    /// anything unset.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            max_connections: env_u32("VENDO_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            connect_timeout: Duration::from_secs(env_u64(
                "VENDO_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
            acquire_timeout: Duration::from_secs(env_u64(
                "VENDO_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
        })
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| Error::Config {
            message: format!("{key} must be a non-negative integer, got {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

fn env_u32(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| Error::Config {
            message: format!("{key} must be a non-negative integer, got {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Establishes a pooled connection using the given settings.
///
/// # Errors
/// Returns an error if the database is unreachable within the configured
/// timeouts.
pub async fn connect(settings: &DatabaseSettings) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .connect_timeout(settings.connect_timeout)
        .acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);

    Database::connect(options).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions.
///
/// Users and products are created before transactions so the ledger's foreign
/// keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let product_table = schema.create_table_from_entity(Product);
    let transaction_table = schema.create_table_from_entity(Transaction);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        product::Model as ProductModel, transaction::Model as TransactionModel,
        user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_settings_defaults() -> Result<()> {
        // No VENDO_* variables are set in the test environment
        let settings = DatabaseSettings::from_env()?;
        assert_eq!(settings.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            settings.connect_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        );
        assert_eq!(
            settings.acquire_timeout,
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
        Ok(())
    }
}
