//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
};

/// How long a request's store work may run before it is cancelled.
pub const DEFAULT_QUERY_DEADLINE: Duration = Duration::from_secs(10);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store for transaction categories.
    pub category_store: SQLiteCategoryStore,

    /// The store for transactions.
    pub transaction_store: SQLiteTransactionStore,

    /// The deadline applied to each request's store work.
    pub query_deadline: Duration,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, query_deadline: Duration) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            category_store: SQLiteCategoryStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection),
            query_deadline,
        })
    }
}
