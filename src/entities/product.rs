//! Product entity - Represents the items stocked in the machine.
//!
//! Each product carries a fixed-point price, the live `quantity_available`
//! counter that the purchase engine debits, and an `is_active` soft-delete
//! flag. Inactive products are hidden from purchase and public listing but
//! retained so old ledger entries keep resolving.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Sparkling Water 330ml")
    pub name: String,
    /// Unit price, three fractional digits of precision
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub price: Decimal,
    /// Units currently in stock; only the locked purchase path may debit this
    pub quantity_available: i32,
    /// Optional long-form description
    pub description: Option<String>,
    /// Optional image URL rendered by the storefront
    pub image_url: Option<String>,
    /// Soft delete flag - inactive products cannot be purchased
    pub is_active: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product appears in many ledger entries
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
