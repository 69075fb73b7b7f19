//! Purchase engine - the single atomic entry point for buying a product.
//!
//! [`process_purchase`] turns a purchase intent into one consistent state
//! change across the product store and the transaction ledger: lock the
//! product row, check availability and stock, capture exact decimal prices,
//! append the ledger entry, debit the stock, commit. Every step runs inside
//! one database transaction; any failure rolls the whole unit back, so a
//! ledger entry exists if and only if the matching stock debit happened.
//!
//! Concurrency correctness rests entirely on the database: the exclusive row
//! lock taken at the first read serializes simultaneous purchases of the same
//! product, so the second buyer's stock check always observes the first
//! buyer's debit. Nothing here retries; contention surfaces as an error and
//! retry policy belongs to the caller.

use crate::{
    core::{product as product_store, transaction as ledger},
    entities::transaction::TransactionStatus,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Id of the ledger entry recording the purchase
    pub transaction_id: i64,
    /// Exact amount charged
    pub total_price: Decimal,
    /// Stock remaining after the debit
    pub remaining_stock: i32,
}

/// Executes a purchase as one atomic check-debit-record unit.
///
/// # Errors
/// - [`Error::InvalidPurchaseData`] for non-positive ids or quantity (nothing
///   is touched);
/// - [`Error::ProductNotFound`] / [`Error::ProductNotAvailable`] /
///   [`Error::InsufficientStock`] from the locked availability check;
/// - [`Error::Persistence`] when the unit fails to commit.
///
/// Any error means no purchase occurred: the transaction handle is dropped
/// un-committed and the database rolls the unit back.
pub async fn process_purchase(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<PurchaseReceipt> {
    if user_id <= 0 || product_id <= 0 || quantity <= 0 {
        return Err(Error::InvalidPurchaseData {
            user_id,
            product_id,
            quantity,
        });
    }

    let txn = db.begin().await?;

    // Exclusive lock: concurrent purchases of this product serialize here
    let product = product_store::get_product_for_update(&txn, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if !product.is_active {
        return Err(Error::ProductNotAvailable { id: product_id });
    }

    if product.quantity_available < quantity {
        return Err(Error::InsufficientStock {
            id: product_id,
            available: product.quantity_available,
            requested: quantity,
        });
    }

    let unit_price = product.price;
    let total_price = unit_price * Decimal::from(quantity);

    let entry = ledger::append_transaction(
        &txn,
        ledger::NewTransaction {
            user_id,
            product_id,
            quantity,
            unit_price,
            total_price,
            status: Some(TransactionStatus::Completed),
        },
    )
    .await?;

    let updated = product_store::decrease_quantity(&txn, product_id, quantity).await?;

    txn.commit().await?;

    info!(
        transaction_id = entry.id,
        user_id,
        product_id,
        quantity,
        %total_price,
        remaining_stock = updated.quantity_available,
        "purchase completed"
    );

    Ok(PurchaseReceipt {
        transaction_id: entry.id,
        total_price,
        remaining_stock: updated.quantity_available,
    })
}
