//! Per-table controller: cached record list kept in step with the server.
//!
//! The cache carries no authoritative guarantee; `refresh` is the only
//! operation that fully reconciles with server truth. Mutations are applied
//! optimistically, and a failed server call leaves the local change in place
//! flagged as not-yet-synced so the dashboard keeps working offline.

use crate::client::api::{ClientError, RecordTransport};
use crate::registry::{encode_key, FieldType, SortDirection, TableSchema};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Distinguishes a hard connection failure from the degraded local-only
/// state a failed mutation leaves behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerError {
    Connection(String),
    /// The cache holds changes the server has not accepted yet.
    Unsynced(String),
}

impl ControllerError {
    pub fn message(&self) -> &str {
        match self {
            ControllerError::Connection(m) | ControllerError::Unsynced(m) => m,
        }
    }
}

pub struct TableController<T: RecordTransport> {
    transport: T,
    schema: TableSchema,
    pub records: Vec<Value>,
    pub loading: bool,
    pub error: Option<ControllerError>,
}

impl<T: RecordTransport> TableController<T> {
    pub fn new(transport: T, schema: TableSchema) -> Self {
        TableController {
            transport,
            schema,
            records: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Fetch the full list and replace local state. The only operation that
    /// reconciles the cache with the server.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.transport.fetch_table(&self.schema.table_id).await;
        self.loading = false;
        match result {
            Ok(rows) => {
                self.records = rows;
                self.apply_sort();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.records.clear();
                self.error = Some(ControllerError::Connection(e.to_string()));
                Err(e)
            }
        }
    }

    /// Normalize and send a new record. On success the server echo is
    /// appended; on failure the normalized record is kept locally and the
    /// unsynced flag raised.
    pub async fn create(&mut self, payload: &Value) -> Result<(), ClientError> {
        let prepared = self.normalize(payload);
        match self
            .transport
            .create_record(&self.schema.table_id, &prepared)
            .await
        {
            Ok(created) => {
                self.records.push(created);
                self.apply_sort();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.records.push(prepared);
                self.apply_sort();
                self.error = Some(ControllerError::Unsynced(e.to_string()));
                Err(e)
            }
        }
    }

    /// Send changed fields for an existing record; the cache entry with the
    /// same key is rewritten either way.
    pub async fn update(&mut self, record: &Value) -> Result<(), ClientError> {
        let id = self.key_of(record)?;
        let result = self
            .transport
            .update_record(&self.schema.table_id, &id, record)
            .await;
        for item in &mut self.records {
            if encode_key(&self.schema, item).as_deref() == Some(id.as_str()) {
                merge_into(item, record);
            }
        }
        self.apply_sort();
        self.settle(result.map(|_| ()))
    }

    /// Delete by key; the cache entry goes away either way.
    pub async fn remove(&mut self, record: &Value) -> Result<(), ClientError> {
        let id = self.key_of(record)?;
        let result = self
            .transport
            .delete_record(&self.schema.table_id, &id)
            .await;
        self.records
            .retain(|item| encode_key(&self.schema, item).as_deref() != Some(id.as_str()));
        self.settle(result)
    }

    fn settle(&mut self, result: Result<(), ClientError>) -> Result<(), ClientError> {
        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(ControllerError::Unsynced(e.to_string()));
                Err(e)
            }
        }
    }

    fn key_of(&self, record: &Value) -> Result<String, ClientError> {
        encode_key(&self.schema, record)
            .ok_or_else(|| ClientError::Api("record is missing its key".into()))
    }

    /// One value per declared field: dates truncated to a calendar day,
    /// absent and null values as blank strings.
    fn normalize(&self, payload: &Value) -> Value {
        let empty = Map::new();
        let src = payload.as_object().unwrap_or(&empty);
        let mut out = Map::with_capacity(self.schema.fields.len());
        for f in &self.schema.fields {
            out.insert(f.name.clone(), normalize_value(src.get(&f.name), f.field_type));
        }
        Value::Object(out)
    }

    fn apply_sort(&mut self) {
        let Some(sort) = self.schema.default_sort.clone() else {
            return;
        };
        self.records.sort_by(|a, b| {
            let first = a.get(&sort.field);
            let second = b.get(&sort.field);
            match (first, second) {
                (None, None) => Ordering::Equal,
                // Missing sorts last regardless of direction.
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => {
                    let ord = compare_values(x, y);
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            }
        });
    }
}

fn normalize_value(value: Option<&Value>, field_type: FieldType) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(v) if field_type == FieldType::Date => {
            let s = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Value::String(s.chars().take(10).collect())
        }
        Some(v) => v.clone(),
    }
}

fn merge_into(target: &mut Value, patch: &Value) {
    if let (Value::Object(t), Value::Object(p)) = (target, patch) {
        for (k, v) in p {
            t.insert(k.clone(), v.clone());
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::api::{ClientError, RecordTransport};
    use crate::registry::pharmacy_registry;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory transport; `fail` makes every call error.
    struct StubTransport {
        rows: Mutex<Vec<Value>>,
        fail: bool,
    }

    impl StubTransport {
        fn seeded(rows: Vec<Value>) -> Self {
            StubTransport {
                rows: Mutex::new(rows),
                fail: false,
            }
        }

        fn failing() -> Self {
            StubTransport {
                rows: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.fail {
                Err(ClientError::Api("server unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RecordTransport for StubTransport {
        async fn fetch_table(&self, _table_id: &str) -> Result<Vec<Value>, ClientError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create_record(
            &self,
            _table_id: &str,
            payload: &Value,
        ) -> Result<Value, ClientError> {
            self.check()?;
            self.rows.lock().unwrap().push(payload.clone());
            Ok(payload.clone())
        }

        async fn update_record(
            &self,
            _table_id: &str,
            _id: &str,
            payload: &Value,
        ) -> Result<Value, ClientError> {
            self.check()?;
            Ok(payload.clone())
        }

        async fn delete_record(&self, _table_id: &str, _id: &str) -> Result<(), ClientError> {
            self.check()
        }
    }

    fn producto_schema() -> TableSchema {
        pharmacy_registry().unwrap().get("producto").unwrap().clone()
    }

    #[tokio::test]
    async fn refresh_applies_default_sort_with_missing_last() {
        let rows = vec![
            json!({"ID_PRODUCTO": 1, "NOMBRE": "Paracetamol"}),
            json!({"ID_PRODUCTO": 2}),
            json!({"ID_PRODUCTO": 3, "NOMBRE": "Aspirina"}),
        ];
        let mut ctl = TableController::new(StubTransport::seeded(rows), producto_schema());
        ctl.refresh().await.unwrap();
        let names: Vec<Option<&str>> = ctl
            .records
            .iter()
            .map(|r| r.get("NOMBRE").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec![Some("Aspirina"), Some("Paracetamol"), None]);
        assert!(ctl.error.is_none());
    }

    #[tokio::test]
    async fn refresh_failure_clears_records_and_flags_connection() {
        let mut ctl = TableController::new(StubTransport::failing(), producto_schema());
        ctl.records.push(json!({"ID_PRODUCTO": 1}));
        assert!(ctl.refresh().await.is_err());
        assert!(ctl.records.is_empty());
        assert!(matches!(ctl.error, Some(ControllerError::Connection(_))));
    }

    #[tokio::test]
    async fn create_normalizes_dates_and_blanks() {
        let mut ctl = TableController::new(StubTransport::seeded(vec![]), producto_schema());
        ctl.create(&json!({
            "NOMBRE": "Aspirina",
            "PRECIO": 12.5,
            "FECHA_VENCIMIENTO": "2025-06-01T00:00:00Z"
        }))
        .await
        .unwrap();
        let rec = &ctl.records[0];
        assert_eq!(rec["FECHA_VENCIMIENTO"], json!("2025-06-01"));
        assert_eq!(rec["DESCRIPCION"], json!(""));
        assert_eq!(rec["PRECIO"], json!(12.5));
    }

    #[tokio::test]
    async fn failed_create_keeps_local_record_flagged_unsynced() {
        let mut ctl = TableController::new(StubTransport::failing(), producto_schema());
        let result = ctl.create(&json!({"NOMBRE": "Aspirina", "PRECIO": 12.5})).await;
        assert!(result.is_err());
        assert_eq!(ctl.records.len(), 1);
        assert_eq!(ctl.records[0]["NOMBRE"], json!("Aspirina"));
        assert!(matches!(ctl.error, Some(ControllerError::Unsynced(_))));
    }

    #[tokio::test]
    async fn update_rewrites_cache_entry_by_key() {
        let rows = vec![
            json!({"ID_PRODUCTO": 1, "NOMBRE": "Aspirina", "PRECIO": "10"}),
            json!({"ID_PRODUCTO": 2, "NOMBRE": "Ibuprofeno", "PRECIO": "8"}),
        ];
        let mut ctl = TableController::new(StubTransport::seeded(rows.clone()), producto_schema());
        ctl.refresh().await.unwrap();
        ctl.update(&json!({"ID_PRODUCTO": 1, "PRECIO": "11"})).await.unwrap();
        let updated = ctl
            .records
            .iter()
            .find(|r| r["ID_PRODUCTO"] == json!(1))
            .unwrap();
        assert_eq!(updated["PRECIO"], json!("11"));
        assert_eq!(updated["NOMBRE"], json!("Aspirina"));
    }

    #[tokio::test]
    async fn remove_drops_exactly_the_keyed_record_even_unsynced() {
        let rows = vec![
            json!({"ID_PRODUCTO": 1, "NOMBRE": "Aspirina"}),
            json!({"ID_PRODUCTO": 2, "NOMBRE": "Ibuprofeno"}),
        ];
        let mut ctl = TableController::new(
            StubTransport {
                rows: Mutex::new(rows),
                fail: true,
            },
            producto_schema(),
        );
        ctl.records = vec![
            json!({"ID_PRODUCTO": 1, "NOMBRE": "Aspirina"}),
            json!({"ID_PRODUCTO": 2, "NOMBRE": "Ibuprofeno"}),
        ];
        let result = ctl.remove(&json!({"ID_PRODUCTO": 1})).await;
        assert!(result.is_err());
        assert_eq!(ctl.records.len(), 1);
        assert_eq!(ctl.records[0]["ID_PRODUCTO"], json!(2));
        assert!(matches!(ctl.error, Some(ControllerError::Unsynced(_))));
    }
}
