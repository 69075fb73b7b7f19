//! Transaction ledger business logic - the append-only purchase record.
//!
//! The ledger is insert-only: entries are created by the purchase engine (or
//! back-office tooling), never deleted, and only their status may change
//! afterwards. Invariant enforcement (stock checks, price math) happens in
//! the purchase engine before anything reaches [`append_transaction`]; this
//! module is deliberately a thin, shape-checked persistence layer plus the
//! read paths the storefront and admin screens consume.

use crate::{
    entities::{Transaction, transaction, transaction::TransactionStatus},
    errors::{Error, Result},
};
use sea_orm::{Order, PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};

/// Field set accepted by [`append_transaction`].
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Purchasing user id
    pub user_id: i64,
    /// Purchased product id
    pub product_id: i64,
    /// Units debited
    pub quantity: i32,
    /// Captured price per unit
    pub unit_price: Decimal,
    /// Captured total, `unit_price` × `quantity`
    pub total_price: Decimal,
    /// Initial status; `None` records the entry as completed
    pub status: Option<TransactionStatus>,
}

/// Listing parameters for [`list_transactions`].
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Maximum rows returned
    pub limit: u64,
    /// Rows skipped before the first returned one
    pub offset: u64,
    /// Sort column
    pub order_by: transaction::Column,
    /// Sort direction
    pub direction: Order,
    /// Restrict to a single user when set
    pub user_id: Option<i64>,
}

impl Default for TransactionPage {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            order_by: transaction::Column::TransactionDate,
            direction: Order::Desc,
            user_id: None,
        }
    }
}

/// Inserts a ledger entry and returns the stored row.
///
/// Pure insert: no business validation happens here beyond the typed shape.
/// The purchase engine is responsible for every invariant (stock, price
/// arithmetic) before calling this, and must call it on its own transaction
/// handle so the entry commits or rolls back together with the stock debit.
pub async fn append_transaction<C>(conn: &C, new: NewTransaction) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let model = transaction::ActiveModel {
        user_id: Set(new.user_id),
        product_id: Set(new.product_id),
        quantity: Set(new.quantity),
        unit_price: Set(new.unit_price),
        total_price: Set(new.total_price),
        status: Set(new.status.unwrap_or(TransactionStatus::Completed)),
        transaction_date: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(conn).await.map_err(Into::into)
}

/// Retrieves a specific ledger entry by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user's purchase history, newest first.
pub async fn list_user_transactions(
    db: &DatabaseConnection,
    user_id: i64,
    limit: u64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::TransactionDate)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves ledger entries with pagination, ordering, and an optional user
/// filter (the admin transaction screen's query).
pub async fn list_transactions(
    db: &DatabaseConnection,
    page: &TransactionPage,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find();
    if let Some(user_id) = page.user_id {
        query = query.filter(transaction::Column::UserId.eq(user_id));
    }

    query
        .order_by(page.order_by, page.direction.clone())
        .limit(page.limit)
        .offset(page.offset)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts ledger entries, optionally restricted to one user.
pub async fn count_transactions(db: &DatabaseConnection, user_id: Option<i64>) -> Result<u64> {
    let mut query = Transaction::find();
    if let Some(user_id) = user_id {
        query = query.filter(transaction::Column::UserId.eq(user_id));
    }

    query.count(db).await.map_err(Into::into)
}

/// Sets a ledger entry's status from its wire spelling.
///
/// Only membership in the `pending`/`completed`/`cancelled` set is enforced;
/// there is no transition graph on top of it. Values outside the set fail
/// with [`Error::InvalidStatus`] before any row is touched.
pub async fn update_status(
    db: &DatabaseConnection,
    transaction_id: i64,
    status: &str,
) -> Result<transaction::Model> {
    let parsed: TransactionStatus = status.parse()?;

    let mut model: transaction::ActiveModel = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?
        .into();

    model.status = Set(parsed);
    model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_product, create_test_purchase_record, create_test_user, setup_test_db,
    };
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_append_transaction_defaults_to_completed() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;

        let entry = append_transaction(
            &db,
            NewTransaction {
                user_id: user.id,
                product_id: product.id,
                quantity: 2,
                unit_price: dec!(3.999),
                total_price: dec!(7.998),
                status: None,
            },
        )
        .await?;

        assert_eq!(entry.user_id, user.id);
        assert_eq!(entry.product_id, product.id);
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.unit_price, dec!(3.999));
        assert_eq!(entry.total_price, dec!(7.998));
        assert_eq!(entry.status, TransactionStatus::Completed);

        Ok(())
    }

    #[tokio::test]
    async fn test_append_transaction_timestamp() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;

        let before = chrono::Utc::now();
        let entry = create_test_purchase_record(&db, user.id, product.id, 1).await?;
        let after = chrono::Utc::now();

        assert!(entry.transaction_date >= before);
        assert!(entry.transaction_date <= after);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_transaction_by_id() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;
        let entry = create_test_purchase_record(&db, user.id, product.id, 1).await?;

        let found = get_transaction_by_id(&db, entry.id).await?;
        assert_eq!(found.unwrap(), entry);

        let missing = get_transaction_by_id(&db, 999).await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_user_transactions_scoped_and_limited() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;

        for _ in 0..3 {
            create_test_purchase_record(&db, alice.id, product.id, 1).await?;
        }
        create_test_purchase_record(&db, bob.id, product.id, 1).await?;

        let alices = list_user_transactions(&db, alice.id, 20).await?;
        assert_eq!(alices.len(), 3);
        assert!(alices.iter().all(|t| t.user_id == alice.id));

        let limited = list_user_transactions(&db, alice.id, 2).await?;
        assert_eq!(limited.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_transactions_pagination_and_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;

        for quantity in 1..=4 {
            create_test_purchase_record(&db, alice.id, product.id, quantity).await?;
        }
        create_test_purchase_record(&db, bob.id, product.id, 9).await?;

        // Ascending by id: insertion order regardless of equal timestamps
        let page = list_transactions(
            &db,
            &TransactionPage {
                limit: 2,
                offset: 1,
                order_by: transaction::Column::Id,
                direction: Order::Asc,
                user_id: Some(alice.id),
            },
        )
        .await?;
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].quantity, 2);
        assert_eq!(page[1].quantity, 3);

        let everything = list_transactions(&db, &TransactionPage::default()).await?;
        assert_eq!(everything.len(), 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_count_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;

        create_test_purchase_record(&db, alice.id, product.id, 1).await?;
        create_test_purchase_record(&db, alice.id, product.id, 1).await?;
        create_test_purchase_record(&db, bob.id, product.id, 1).await?;

        assert_eq!(count_transactions(&db, None).await?, 3);
        assert_eq!(count_transactions(&db, Some(alice.id)).await?, 2);
        assert_eq!(count_transactions(&db, Some(999)).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let product = create_test_product(&db, "Cola 500ml").await?;
        let entry = create_test_purchase_record(&db, user.id, product.id, 1).await?;

        let cancelled = update_status(&db, entry.id, "cancelled").await?;
        assert_eq!(cancelled.status, TransactionStatus::Cancelled);

        // Everything but status is untouched
        assert_eq!(cancelled.quantity, entry.quantity);
        assert_eq!(cancelled.total_price, entry.total_price);
        assert_eq!(cancelled.transaction_date, entry.transaction_date);

        let pending = update_status(&db, entry.id, "pending").await?;
        assert_eq!(pending.status, TransactionStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_value() -> Result<()> {
        // Parse failure happens before any query
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = update_status(&db, 1, "refunded").await;
        match result.unwrap_err() {
            Error::InvalidStatus { value } => assert_eq!(value, "refunded"),
            other => panic!("unexpected error: {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_status(&db, 999, "completed").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 999 }
        ));

        Ok(())
    }
}
