//! User entity - Account rows referenced by the ledger.
//!
//! The purchase engine only ever consumes a resolved user id; registration,
//! authentication, and password hashing live in the separate auth service.
//! The table exists here so ledger rows keep referential integrity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login / display name
    pub username: String,
    /// Contact address, unique per account
    #[sea_orm(unique)]
    pub email: String,
    /// Password hash as produced by the auth service; opaque here
    pub password_hash: String,
    /// Coarse role marker (`"admin"` or `"customer"`)
    pub role: String,
    /// When the account was created
    pub created_at: DateTime,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user accumulates many ledger entries
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
