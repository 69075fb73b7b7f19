//! Product store business logic - authoritative inventory state.
//!
//! This module owns every read and write against the products table: plain
//! CRUD for the back office, the advisory stock check used by storefront
//! pre-validation, and the two primitives the purchase engine builds on - the
//! locked read and the quantity decrement. All functions are async, take the
//! connection explicitly, and return the crate Result type.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{Order, PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};

/// Field set accepted by [`create_product`] and [`update_product`].
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Display name, must be non-empty
    pub name: String,
    /// Unit price, must be non-negative
    pub price: Decimal,
    /// Stock level, must be non-negative
    pub quantity_available: i32,
    /// Optional long-form description
    pub description: Option<String>,
    /// Optional storefront image URL
    pub image_url: Option<String>,
    /// Whether the product is purchasable
    pub is_active: bool,
}

fn validate_input(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if input.price < Decimal::ZERO {
        return Err(Error::Validation {
            message: format!("Product price cannot be negative: {}", input.price),
        });
    }

    if input.quantity_available < 0 {
        return Err(Error::Validation {
            message: format!(
                "Product quantity cannot be negative: {}",
                input.quantity_available
            ),
        });
    }

    Ok(())
}

/// Retrieves products with pagination and ordering, optionally restricted to
/// active ones (the public listing hides deactivated products).
pub async fn list_products(
    db: &DatabaseConnection,
    limit: u64,
    offset: u64,
    order_by: product::Column,
    direction: Order,
    active_only: bool,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();
    if active_only {
        query = query.filter(product::Column::IsActive.eq(true));
    }

    query
        .order_by(order_by, direction)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts products, optionally restricted to active ones.
pub async fn count_products(db: &DatabaseConnection, active_only: bool) -> Result<u64> {
    let mut query = Product::find();
    if active_only {
        query = query.filter(product::Column::IsActive.eq(true));
    }

    query.count(db).await.map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
///
/// Deactivated products are still returned here so ledger history and the
/// back office keep resolving them; purchase-path availability is checked
/// separately.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Reads a product row under an exclusive row lock (`SELECT ... FOR UPDATE`).
///
/// Must be called on a transaction handle; the lock is held until that
/// transaction commits or rolls back, which is what serializes concurrent
/// purchases of the same product. On `SQLite` the locking clause is a no-op
/// and the database's single-writer lock provides the same serialization.
pub async fn get_product_for_update<C>(conn: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty name or a negative price or
/// quantity.
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> Result<product::Model> {
    validate_input(&input)?;

    let now = chrono::Utc::now().naive_utc();

    let model = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        price: Set(input.price),
        quantity_available: Set(input.quantity_available),
        description: Set(input.description),
        image_url: Set(input.image_url),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Replaces an existing product's fields, performing input validation and
/// refreshing the updated timestamp.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or
/// [`Error::Validation`] for rejected input.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate_input(&input)?;

    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    model.name = Set(input.name.trim().to_string());
    model.price = Set(input.price);
    model.quantity_available = Set(input.quantity_available);
    model.description = Set(input.description);
    model.image_url = Set(input.image_url);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(chrono::Utc::now().naive_utc());

    model.update(db).await.map_err(Into::into)
}

/// Soft deletes a product by clearing `is_active`, preserving ledger history.
///
/// The row remains readable by id; it simply stops being purchasable and
/// disappears from public listing and search.
pub async fn deactivate_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<product::Model> {
    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    model.is_active = Set(false);
    model.updated_at = Set(chrono::Utc::now().naive_utc());

    model.update(db).await.map_err(Into::into)
}

/// Permanently removes a product row.
///
/// Destructive back-office escape hatch; the purchase flow never calls this.
/// Products with ledger history should be deactivated instead.
pub async fn hard_delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    Ok(())
}

/// Sets a product's stock to an absolute value (inventory management).
///
/// # Errors
/// Returns [`Error::Validation`] for a negative quantity and
/// [`Error::ProductNotFound`] for a missing product.
pub async fn update_quantity(
    db: &DatabaseConnection,
    product_id: i64,
    new_quantity: i32,
) -> Result<product::Model> {
    if new_quantity < 0 {
        return Err(Error::Validation {
            message: format!("Quantity cannot be negative: {new_quantity}"),
        });
    }

    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    model.quantity_available = Set(new_quantity);
    model.updated_at = Set(chrono::Utc::now().naive_utc());

    model.update(db).await.map_err(Into::into)
}

/// Debits `amount` units from a product's stock and returns the updated row.
///
/// The write is a single relative `UPDATE` (`quantity_available =
/// quantity_available - ?`) so the statement itself cannot lose a concurrent
/// debit. The non-negative check re-reads through `conn`: inside the purchase
/// engine's transaction that read is the locked one, and for direct callers
/// it is a defensive double-check surfacing as
/// [`Error::InsufficientInventory`].
pub async fn decrease_quantity<C>(
    conn: &C,
    product_id: i64,
    amount: i32,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    if amount <= 0 {
        return Err(Error::Validation {
            message: format!("Decrement amount must be positive: {amount}"),
        });
    }

    let current = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if current.quantity_available < amount {
        return Err(Error::InsufficientInventory {
            id: product_id,
            available: current.quantity_available,
            requested: amount,
        });
    }

    Product::update_many()
        .col_expr(
            product::Column::QuantityAvailable,
            Expr::col(product::Column::QuantityAvailable).sub(amount),
        )
        .col_expr(
            product::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(conn)
        .await?;

    Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Advisory check that a product is active and has at least
/// `required_quantity` units in stock.
///
/// This read takes no lock and can be stale by the time the caller acts on
/// it; it exists for storefront pre-validation only. The authoritative check
/// is the locked read inside the purchase engine - never use this to enforce
/// correctness.
pub async fn has_stock(
    db: &DatabaseConnection,
    product_id: i64,
    required_quantity: i32,
) -> Result<bool> {
    let Some(found) = get_product_by_id(db, product_id).await? else {
        return Ok(false);
    };

    Ok(found.is_active && found.quantity_available >= required_quantity)
}

/// Searches active products by name substring, alphabetically.
pub async fn search_products(
    db: &DatabaseConnection,
    term: &str,
    limit: u64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::Name.contains(term))
        .order_by_asc(product::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
