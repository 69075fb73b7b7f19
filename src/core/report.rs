//! Sales reporting - read-side projections over the ledger.
//!
//! Everything here is a pure aggregation over `completed` ledger entries,
//! computed in SQL and returned as structured data for the presentation
//! layer to format. There are no invariants to protect: these queries take
//! no locks and never write.

use crate::{
    entities::{Transaction, product, transaction, transaction::TransactionStatus},
    errors::Result,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Func, SimpleExpr};
use sea_orm::{
    DatabaseConnection, FromQueryResult, IntoSimpleExpr, JoinType, Order, QueryOrder, QuerySelect,
    RelationTrait, prelude::*,
};

/// Aggregated sales figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Default, FromQueryResult)]
pub struct ProductSales {
    /// Number of completed purchases
    pub total_transactions: i64,
    /// Units sold across those purchases (`None` when there are none)
    pub total_quantity_sold: Option<i64>,
    /// Revenue across those purchases (`None` when there are none)
    pub total_revenue: Option<Decimal>,
    /// Average captured unit price (`None` when there are none)
    pub average_unit_price: Option<Decimal>,
}

/// Store-wide sales figures for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, FromQueryResult)]
pub struct SalesStats {
    /// Number of completed purchases in the range
    pub total_transactions: i64,
    /// Units sold in the range (`None` when there are none)
    pub total_items_sold: Option<i64>,
    /// Revenue in the range (`None` when there are none)
    pub total_revenue: Option<Decimal>,
    /// Distinct buyers in the range
    pub unique_customers: i64,
    /// Distinct products purchased in the range
    pub products_sold: i64,
}

/// One row of the top-sellers report.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct TopProduct {
    /// Product id
    pub product_id: i64,
    /// Product name at query time
    pub name: String,
    /// Current unit price (not the historical captured one)
    pub price: Decimal,
    /// Units sold in the period
    pub total_sold: i64,
    /// Revenue in the period
    pub total_revenue: Decimal,
    /// Number of completed purchases in the period
    pub transaction_count: i64,
}

/// Time window for [`top_selling_products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    /// No time restriction
    All,
    /// Since local-UTC midnight
    Today,
    /// Trailing seven days
    Week,
    /// Trailing thirty days
    Month,
}

impl SalesPeriod {
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Today => Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
        }
    }
}

/// Aggregates completed sales for a single product.
pub async fn product_sales(db: &DatabaseConnection, product_id: i64) -> Result<ProductSales> {
    let stats = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Id.count(), "total_transactions")
        .column_as(transaction::Column::Quantity.sum(), "total_quantity_sold")
        .column_as(transaction::Column::TotalPrice.sum(), "total_revenue")
        .column_as(
            SimpleExpr::from(Func::avg(
                transaction::Column::UnitPrice.into_simple_expr(),
            )),
            "average_unit_price",
        )
        .filter(transaction::Column::ProductId.eq(product_id))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed))
        .into_model::<ProductSales>()
        .one(db)
        .await?;

    Ok(stats.unwrap_or_default())
}

/// Aggregates store-wide completed sales between `start_date` and `end_date`
/// (both inclusive, whole days in UTC).
pub async fn sales_stats(
    db: &DatabaseConnection,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<SalesStats> {
    let start = start_date.and_time(NaiveTime::MIN).and_utc();
    let end = (end_date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();

    let stats = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Id.count(), "total_transactions")
        .column_as(transaction::Column::Quantity.sum(), "total_items_sold")
        .column_as(transaction::Column::TotalPrice.sum(), "total_revenue")
        .column_as(
            SimpleExpr::from(Func::count_distinct(
                transaction::Column::UserId.into_simple_expr(),
            )),
            "unique_customers",
        )
        .column_as(
            SimpleExpr::from(Func::count_distinct(
                transaction::Column::ProductId.into_simple_expr(),
            )),
            "products_sold",
        )
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed))
        .filter(transaction::Column::TransactionDate.gte(start))
        .filter(transaction::Column::TransactionDate.lt(end))
        .into_model::<SalesStats>()
        .one(db)
        .await?;

    Ok(stats.unwrap_or_default())
}

/// Returns the best-selling products in the period, most units first.
pub async fn top_selling_products(
    db: &DatabaseConnection,
    limit: u64,
    period: SalesPeriod,
) -> Result<Vec<TopProduct>> {
    let mut query = Transaction::find()
        .join(JoinType::InnerJoin, transaction::Relation::Product.def())
        .select_only()
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Name, "name")
        .column_as(product::Column::Price, "price")
        .column_as(transaction::Column::Quantity.sum(), "total_sold")
        .column_as(transaction::Column::TotalPrice.sum(), "total_revenue")
        .column_as(transaction::Column::Id.count(), "transaction_count")
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed));

    if let Some(cutoff) = period.cutoff(Utc::now()) {
        query = query.filter(transaction::Column::TransactionDate.gte(cutoff));
    }

    query
        .group_by(product::Column::Id)
        .group_by(product::Column::Name)
        .group_by(product::Column::Price)
        .order_by(transaction::Column::Quantity.sum(), Order::Desc)
        .limit(limit)
        .into_model::<TopProduct>()
        .all(db)
        .await
        .map_err(Into::into)
}
