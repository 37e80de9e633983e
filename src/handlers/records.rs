//! Table CRUD handlers: list, create, update, delete.

use crate::error::AppError;
use crate::registry::{parse_key_segment, TableSchema};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

fn resolve_table<'a>(state: &'a AppState, table_id: &str) -> Result<&'a TableSchema, AppError> {
    state
        .registry
        .get(table_id)
        .ok_or_else(|| AppError::NotFound(table_id.to_string()))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = resolve_table(&state, &table_id)?;
    let rows = CrudService::list(&state.gateway, schema).await?;
    Ok((StatusCode::OK, Json(Value::Array(rows))))
}

pub async fn create(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = resolve_table(&state, &table_id)?;
    let body = body_to_map(body)?;
    let created = CrudService::create(&state.gateway, schema, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table_id, id_segment)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = resolve_table(&state, &table_id)?;
    let key = parse_key_segment(schema, &id_segment)?;
    let body = body_to_map(body)?;
    let updated = CrudService::update(&state.gateway, schema, &key, &body).await?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((table_id, id_segment)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = resolve_table(&state, &table_id)?;
    let key = parse_key_segment(schema, &id_segment)?;
    CrudService::remove(&state.gateway, schema, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
