//! Centsible is a small JSON API for tracking personal finances.
//!
//! It keeps categories and dated monetary transactions in a SQLite database
//! and serves two reporting views on top of them: a per-category monthly
//! pivot of spending and income, and a month-by-month savings vector. All
//! monetary values are exact integer cents.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod cursor;
mod db;
mod endpoints;
mod models;
mod money;
mod routes;
mod stores;
mod summary;

pub use app_state::{AppState, DEFAULT_QUERY_DEADLINE};
pub use cursor::PaginationCursor;
pub use db::initialize as initialize_db;
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A report was requested for a year that is not a positive calendar
    /// year.
    #[error("year must be a positive integer, got {0}")]
    InvalidYear(i32),

    /// Exactly one of the two cursor fields was supplied on a list request.
    ///
    /// The keyset cursor is a (date, id) pair. One field on its own does not
    /// identify a position in the sort order, so the request is rejected
    /// rather than guessed at.
    #[error("after_date and after_id must be provided together")]
    IncompleteCursor,

    /// A page size of zero was requested.
    #[error("limit must be a positive integer")]
    InvalidLimit,

    /// The category ID used to create or update a transaction did not match
    /// a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<models::DatabaseID>),

    /// An amount read from the database carries sub-cent precision and
    /// cannot round-trip through integer cents.
    ///
    /// This indicates an inconsistency in the stored data, not a client
    /// mistake, so it is surfaced as an internal error.
    #[error("the amount \"{0}\" is not a whole number of cents")]
    SubCentAmount(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The caller's deadline expired before the operation completed.
    ///
    /// Distinct from [Error::SqlError] so that callers can avoid logging an
    /// abandoned request as an unexpected failure.
    #[error("the operation was cancelled before it completed")]
    Cancelled,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidYear(_)
            | Error::IncompleteCursor
            | Error::InvalidLimit
            | Error::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Cancelled => {
                tracing::debug!("request abandoned: {}", self);
                StatusCode::GATEWAY_TIMEOUT
            }
            Error::SubCentAmount(_) | Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
