//! CRUD routes. Parameterized paths: handlers resolve the table from the
//! segment, so only registered identifiers get anywhere near SQL.

use crate::handlers::records::{create, delete as delete_handler, list, update};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn record_routes(state: AppState) -> Router {
    Router::new()
        .route("/:table", get(list).post(create))
        .route("/:table/:id", put(update).delete(delete_handler))
        .with_state(state)
}
