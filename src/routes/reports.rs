//! The routes for the reporting views.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    summary::{self, MonthlySavings, TransactionsSummary},
};

use super::run_with_deadline;

/// The query string parameters accepted by the report routes.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// The calendar year to report on. Must be positive.
    year: i32,
}

/// Get the per-category monthly spending and income summary for a year.
pub async fn get_transactions_summary(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<TransactionsSummary>, Error> {
    let AppState {
        category_store,
        transaction_store,
        query_deadline,
    } = state;

    let summary = run_with_deadline(query_deadline, move || {
        summary::transactions_summary(&category_store, &transaction_store, params.year)
    })
    .await?;

    Ok(Json(summary))
}

/// Get the net savings for each month of a year.
pub async fn get_monthly_savings(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<MonthlySavings>, Error> {
    let store = state.transaction_store;
    let savings = run_with_deadline(state.query_deadline, move || {
        summary::monthly_savings(&store, params.year)
    })
    .await?;

    Ok(Json(savings))
}
