//! Generic CRUD execution: Parse → Validate → BuildStatement → Execute →
//! MapResponse, one autocommitted statement per request.

use crate::error::AppError;
use crate::gateway::DbGateway;
use crate::registry::{RecordKey, TableSchema};
use crate::sql;
use serde_json::{Map, Value};

pub struct CrudService;

impl CrudService {
    /// Full row set for a table. No filtering or server-side ordering.
    pub async fn list(gateway: &DbGateway, schema: &TableSchema) -> Result<Vec<Value>, AppError> {
        let q = sql::select_all(schema);
        gateway.fetch_all(&q).await
    }

    /// Insert the body's declared non-auto fields. Echoes the filtered
    /// payload back (the caller's view of "created" is optimistic; no
    /// re-fetch of the database-assigned columns).
    pub async fn create(
        gateway: &DbGateway,
        schema: &TableSchema,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let payload: Map<String, Value> = schema
            .insertable_fields()
            .filter_map(|f| body.get(&f.name).map(|v| (f.name.clone(), v.clone())))
            .collect();
        if payload.is_empty() {
            return Err(AppError::Validation("no valid fields".into()));
        }
        for f in schema.insertable_fields().filter(|f| f.required) {
            let missing = match payload.get(&f.name) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(AppError::Validation(format!("{} is required", f.name)));
            }
        }
        let q = sql::insert(schema, &payload)?;
        gateway.execute(&q).await?;
        Ok(Value::Object(payload))
    }

    /// Update by key, setting only the non-key declared fields present in the
    /// body. A body with nothing to set is a no-op success: the input is
    /// echoed and no statement is issued.
    pub async fn update(
        gateway: &DbGateway,
        schema: &TableSchema,
        key: &RecordKey,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let payload = pick_fields(schema, body);
        let echo = merge_key(payload.clone(), key);
        if sql::updatable_fields(schema, &payload).is_empty() {
            return Ok(echo);
        }
        let q = sql::update(schema, key, &payload)?;
        gateway.execute(&q).await?;
        Ok(echo)
    }

    /// Delete by key.
    pub async fn remove(
        gateway: &DbGateway,
        schema: &TableSchema,
        key: &RecordKey,
    ) -> Result<(), AppError> {
        let q = sql::delete(schema, key)?;
        gateway.execute(&q).await?;
        Ok(())
    }
}

/// Keep only the fields declared in the schema.
fn pick_fields(schema: &TableSchema, body: &Map<String, Value>) -> Map<String, Value> {
    schema
        .fields
        .iter()
        .filter_map(|f| body.get(&f.name).map(|v| (f.name.clone(), v.clone())))
        .collect()
}

/// Body fields plus the key fields; key values win.
fn merge_key(mut payload: Map<String, Value>, key: &RecordKey) -> Value {
    for (field, value) in key.pairs() {
        payload.insert(field.clone(), value.clone());
    }
    Value::Object(payload)
}
