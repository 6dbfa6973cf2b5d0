//! The HTTP layer: route table and request handlers.

mod categories;
mod health;
mod reports;
mod transactions;

use std::time::Duration;

use axum::{
    Router,
    extract::{MatchedPath, Request},
    routing::get,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{AppState, Error, endpoints};

/// Return a router with all the app's routes and middleware.
///
/// Every response carries an `X-Request-ID` header: a fresh UUID unless the
/// client sent its own, in which case that ID is kept and echoed back. The
/// ID is also recorded on the request's tracing span.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(endpoints::HEALTHZ, get(health::get_health))
        .route(
            endpoints::CATEGORIES,
            get(categories::get_categories).post(categories::create_category),
        )
        .route(
            endpoints::CATEGORY,
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(transactions::get_transactions).post(transactions::create_transaction),
        )
        .route(
            endpoints::TRANSACTION,
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route(
            endpoints::TRANSACTIONS_SUMMARY,
            get(reports::get_transactions_summary),
        )
        .route(endpoints::MONTHLY_SAVINGS, get(reports::get_monthly_savings))
        .with_state(state);

    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            let request_id = req
                .headers()
                .get("x-request-id")
                .and_then(|id| id.to_str().ok());

            tracing::debug_span!("request", %method, %uri, matched_path, request_id)
        })
        // 5xx responses are logged where the error is converted into a
        // response, so the layer's own failure logging is disabled.
        .on_failure(());

    // Layering order matters: the ID is assigned in the outermost layer so
    // the tracing span can pick it up, and the innermost layer copies it
    // onto the response.
    routes
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(tracing_layer)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Run `task` on the blocking thread pool, abandoning it once `deadline`
/// has passed.
///
/// Store work is synchronous SQLite access, so it runs off the async
/// runtime; the deadline is what turns a caller hanging up (or a wedged
/// query) into [Error::Cancelled] instead of a stuck request.
pub(crate) async fn run_with_deadline<F, R>(deadline: Duration, task: F) -> Result<R, Error>
where
    F: FnOnce() -> Result<R, Error> + Send + 'static,
    R: Send + 'static,
{
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(task)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            if join_error.is_panic() {
                std::panic::resume_unwind(join_error.into_panic());
            }

            Err(Error::Cancelled)
        }
        Err(_elapsed) => Err(Error::Cancelled),
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, DEFAULT_QUERY_DEADLINE, build_router};

    pub(crate) fn get_test_server() -> (TestServer, AppState) {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection, DEFAULT_QUERY_DEADLINE)
            .expect("Could not initialize database.");

        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::{HeaderName, HeaderValue};

    use crate::{endpoints, routes::test_utils::get_test_server};

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::HEALTHZ).await;

        let request_id = response
            .maybe_header("x-request-id")
            .expect("response is missing the x-request-id header");
        assert!(!request_id.is_empty());
    }

    #[tokio::test]
    async fn client_supplied_request_id_is_echoed_back() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::HEALTHZ)
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("caller-chosen-id"),
            )
            .await;

        assert_eq!(response.header("x-request-id"), "caller-chosen-id");
    }
}
