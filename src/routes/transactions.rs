//! The routes for creating, viewing, editing, deleting and listing
//! transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    cursor::PaginationCursor,
    models::{DatabaseID, Transaction, TransactionData},
    routes::run_with_deadline,
    stores::{TransactionKind, TransactionQuery, TransactionStore},
};

/// How many transactions a listing returns when the client does not say.
const DEFAULT_PAGE_SIZE: u64 = 50;

/// Create a new transaction.
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let store = state.transaction_store;
    let transaction = run_with_deadline(state.query_deadline, move || store.create(data)).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Get a single transaction by its ID.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error> {
    let store = state.transaction_store;
    let transaction =
        run_with_deadline(state.query_deadline, move || store.get(transaction_id)).await?;

    Ok(Json(transaction))
}

/// Overwrite the client-supplied fields of an existing transaction.
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    let store = state.transaction_store;
    let transaction = run_with_deadline(state.query_deadline, move || {
        store.update(transaction_id, data)
    })
    .await?;

    Ok(Json(transaction))
}

/// Delete a transaction.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    let store = state.transaction_store;
    run_with_deadline(state.query_deadline, move || store.delete(transaction_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The query string parameters accepted by [get_transactions].
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    /// The maximum number of transactions to return. Defaults to 50, must
    /// be positive.
    limit: Option<u64>,
    /// Include transactions dated on or after this date.
    from_date: Option<Date>,
    /// Include transactions dated on or before this date.
    to_date: Option<Date>,
    /// Accepted alias for `to_date`, kept for older clients.
    start_date: Option<Date>,
    /// Include only transactions assigned to this category.
    category_id: Option<DatabaseID>,
    /// Include only "spending" or only "income" transactions.
    #[serde(rename = "type")]
    kind: Option<TransactionKind>,
    /// The date half of the pagination cursor. Must be paired with
    /// `after_id`.
    after_date: Option<Date>,
    /// The ID half of the pagination cursor. Must be paired with
    /// `after_date`.
    after_id: Option<DatabaseID>,
}

/// The response body of [get_transactions].
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionList {
    /// The matching transactions, most recent first.
    pub transactions: Vec<Transaction>,
}

impl ListTransactionsParams {
    /// Validate the parameters and convert them into a store query.
    ///
    /// # Errors
    /// Returns [Error::InvalidLimit] for a zero limit and
    /// [Error::IncompleteCursor] when only one cursor half is present.
    fn into_query(self) -> Result<TransactionQuery, Error> {
        let limit = match self.limit {
            Some(0) => return Err(Error::InvalidLimit),
            Some(limit) => limit,
            None => DEFAULT_PAGE_SIZE,
        };
        let after = PaginationCursor::from_parts(self.after_date, self.after_id)?;

        Ok(TransactionQuery {
            from_date: self.from_date,
            to_date: self.to_date.or(self.start_date),
            category_id: self.category_id,
            kind: self.kind,
            limit: Some(limit),
            after,
        })
    }
}

/// List transactions, most recent first.
///
/// All filters are optional and combine with logical AND. Parameter
/// validation happens before the store is touched, so a bad request never
/// costs a query.
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<TransactionList>, Error> {
    let query = params.into_query()?;

    let store = state.transaction_store;
    let transactions =
        run_with_deadline(state.query_deadline, move || store.get_query(query)).await?;

    Ok(Json(TransactionList { transactions }))
}
