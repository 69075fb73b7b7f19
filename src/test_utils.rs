//! Shared test utilities for `vendo`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config,
    core::{product, transaction},
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is pinned to a single connection: every pooled connection to
/// `sqlite::memory:` gets its own independent database, and a single writer
/// also serializes concurrent test transactions the way one `SQLite` file
/// does.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options).await?;
    config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a user row so ledger foreign keys resolve.
///
/// The email is derived from the username; the password hash is an opaque
/// placeholder since authentication lives outside this crate.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    entities::user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("test-password-hash".to_string()),
        role: Set("customer".to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active test product with sensible defaults.
///
/// # Defaults
/// * `price`: 3.999
/// * `quantity_available`: 10
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    create_custom_product(db, name, dec!(3.999), 10, true).await
}

/// Creates a test product with custom price, stock, and active flag.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    quantity_available: i32,
    is_active: bool,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        product::ProductInput {
            name: name.to_string(),
            price,
            quantity_available,
            description: None,
            image_url: None,
            is_active,
        },
    )
    .await
}

/// Appends a completed ledger entry directly, bypassing the purchase engine.
///
/// For read-path tests that need rows without exercising stock debits. The
/// captured unit price is a flat 2.000.
pub async fn create_test_purchase_record(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<entities::transaction::Model> {
    let unit_price = dec!(2.000);
    transaction::append_transaction(
        db,
        transaction::NewTransaction {
            user_id,
            product_id,
            quantity,
            unit_price,
            total_price: unit_price * Decimal::from(quantity),
            status: None,
        },
    )
    .await
}
