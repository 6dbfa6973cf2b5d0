//! Defines the transaction store trait and its query type.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    cursor::PaginationCursor,
    models::{DatabaseID, Transaction, TransactionData},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore: Send + Sync {
    /// Create a new transaction in the store.
    fn create(&self, data: TransactionData) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Overwrite the client-supplied fields of an existing transaction.
    fn update(&self, id: DatabaseID, data: TransactionData) -> Result<Transaction, Error>;

    /// Remove a transaction from the store.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;

    /// Retrieve transactions matching `query`, ordered by date descending
    /// and then by ID descending.
    ///
    /// The ordering is fixed: it is what makes the keyset cursor in
    /// [TransactionQuery::after] well defined across pages.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;
}

/// Selects transactions by their sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Transactions with a negative amount.
    Spending,
    /// Transactions with a positive amount.
    Income,
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
///
/// All filters are optional and combine with logical AND. An amount of
/// exactly zero matches neither [TransactionKind::Spending] nor
/// [TransactionKind::Income].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions dated on or after this date.
    pub from_date: Option<Date>,
    /// Include transactions dated on or before this date.
    pub to_date: Option<Date>,
    /// Include only transactions assigned to this category. Transactions
    /// without a category never match.
    pub category_id: Option<DatabaseID>,
    /// Include only transactions with this sign.
    pub kind: Option<TransactionKind>,
    /// Selects up to the first N (`limit`) transactions. `None` returns
    /// every match.
    pub limit: Option<u64>,
    /// Resume a previous listing: only rows strictly after this position in
    /// the (date descending, id descending) order are returned.
    pub after: Option<PaginationCursor>,
}
