//! The domain models: categories and the transactions that reference them.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

/// A dated, signed monetary amount, optionally assigned to a [Category].
///
/// Amounts are integer cents: negative for money going out, positive for
/// money coming in. The category reference is weak, a transaction survives
/// the deletion of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction. Immutable once assigned.
    pub id: DatabaseID,
    /// The calendar date the transaction happened on (no time component).
    pub date: Date,
    /// The category this transaction belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The signed amount in integer cents.
    pub amount_cents: i64,
    /// A free-text description of what the transaction was for.
    pub description: Option<String>,
    /// When the record was created. Immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The client-supplied fields of a [Transaction], used for create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionData {
    /// The calendar date the transaction happened on.
    pub date: Date,
    /// The category to assign the transaction to, if any.
    pub category_id: Option<DatabaseID>,
    /// The signed amount in integer cents.
    pub amount_cents: i64,
    /// A free-text description.
    pub description: Option<String>,
}

/// A label that transactions can be grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The display name. Uniqueness is not enforced.
    pub name: String,
    /// When the record was created. Immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The client-supplied fields of a [Category].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryData {
    /// The display name for the category.
    pub name: String,
}
