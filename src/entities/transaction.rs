//! Transaction entity - The append-only purchase ledger.
//!
//! Each row is the durable record of one successful stock debit: who bought
//! what, how many units, and at which captured price. Rows are never deleted
//! and, apart from `status`, never mutated after creation.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a ledger entry.
///
/// The purchase engine writes every entry as `Completed`; `Pending` and
/// `Cancelled` exist for back-office status corrections only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    /// Recorded but not yet settled
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled purchase (the default for every engine-created entry)
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Voided by a back-office correction
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl TransactionStatus {
    /// The wire/database spelling of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = crate::errors::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(crate::errors::Error::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchasing user (foreign reference; the ledger does not own users)
    pub user_id: i64,
    /// Purchased product (foreign reference)
    pub product_id: i64,
    /// Units debited, always positive
    pub quantity: i32,
    /// Price per unit captured at purchase time
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub unit_price: Decimal,
    /// `unit_price` × `quantity`, computed with exact decimal arithmetic
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub total_price: Decimal,
    /// Lifecycle state; the only mutable field
    pub status: TransactionStatus,
    /// When the purchase was recorded; immutable
    pub transaction_date: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each transaction references one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
