//! Unified error type for the purchase engine.
//!
//! Callers pattern-match on the variants; the display messages are for logs
//! only. Any `Persistence` error means the enclosing atomic unit was rolled
//! back and no purchase occurred.

use thiserror::Error;

/// Errors surfaced by the product store, transaction ledger, and purchase engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed purchase input (non-positive identifiers or quantity).
    /// Caller's fault; never retried automatically.
    #[error(
        "invalid purchase data (user {user_id}, product {product_id}, quantity {quantity})"
    )]
    InvalidPurchaseData {
        /// Acting user id as received
        user_id: i64,
        /// Target product id as received
        product_id: i64,
        /// Requested quantity as received
        quantity: i32,
    },

    /// Referenced product does not exist.
    #[error("product {id} not found")]
    ProductNotFound {
        /// Product id that failed to resolve
        id: i64,
    },

    /// Product exists but has been deactivated.
    #[error("product {id} is not available")]
    ProductNotAvailable {
        /// Deactivated product id
        id: i64,
    },

    /// Requested quantity exceeds the stock observed under the row lock.
    #[error("insufficient stock for product {id}: {available} available, {requested} requested")]
    InsufficientStock {
        /// Product id
        id: i64,
        /// Stock at lock time
        available: i32,
        /// Quantity requested
        requested: i32,
    },

    /// Raised by the store's low-level decrement when the debit would go
    /// negative. Unreachable through the purchase engine's own check; kept
    /// as a safety net for direct callers.
    #[error(
        "insufficient inventory for product {id}: {available} available, {requested} requested"
    )]
    InsufficientInventory {
        /// Product id
        id: i64,
        /// Stock at read time
        available: i32,
        /// Amount requested
        requested: i32,
    },

    /// Status value outside the permitted `pending`/`completed`/`cancelled` set.
    #[error("invalid transaction status {value:?}")]
    InvalidStatus {
        /// The rejected value
        value: String,
    },

    /// Referenced ledger entry does not exist.
    #[error("transaction {id} not found")]
    TransactionNotFound {
        /// Transaction id that failed to resolve
        id: i64,
    },

    /// Malformed entity input (empty name, negative price or quantity).
    #[error("validation error: {message}")]
    Validation {
        /// What was rejected
        message: String,
    },

    /// Configuration error: bad environment settings or seed catalog.
    #[error("configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },

    /// The underlying atomic transaction failed to commit (lock timeout,
    /// connection loss, constraint violation). Always a full rollback.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sea_orm::DbErr),
}

// Convenience `Result` type
/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
