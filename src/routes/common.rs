//! Health route: answers ok once the database pool responds to a ping.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.gateway.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": e.to_string()})),
        ),
    }
}

pub fn common_routes(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
