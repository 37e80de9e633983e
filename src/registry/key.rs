//! Record identity: the projection of a record onto its primary-key fields,
//! and the URL segment form `field1=value1|field2=value2` used for composite
//! keys.

use super::types::{PrimaryKey, TableSchema};
use crate::error::AppError;
use serde_json::Value;

/// Primary-key values for one record, in schema key order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordKey {
    pairs: Vec<(String, Value)>,
}

impl RecordKey {
    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.pairs.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    pub fn into_pairs(self) -> Vec<(String, Value)> {
        self.pairs
    }
}

/// Coerce a decoded path value: numeric when the whole string parses as a
/// number, otherwise kept as a string.
fn coerce_scalar(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

/// Decode the id path segment for a table. The router has already
/// percent-decoded the segment.
///
/// Single key: the whole segment is the value. Composite key: `|`-joined
/// `field=value` pairs; every key field must be present, and each sub-value
/// is coerced independently.
pub fn parse_key_segment(schema: &TableSchema, segment: &str) -> Result<RecordKey, AppError> {
    match &schema.primary_key {
        PrimaryKey::Single(field) => Ok(RecordKey {
            pairs: vec![(field.clone(), coerce_scalar(segment))],
        }),
        PrimaryKey::Composite(fields) => {
            let mut decoded: Vec<(String, Value)> = Vec::with_capacity(fields.len());
            for pair in segment.split('|') {
                let Some((field, raw)) = pair.split_once('=') else {
                    return Err(AppError::Validation(format!(
                        "malformed key segment: '{pair}'"
                    )));
                };
                if !fields.iter().any(|f| f == field) {
                    return Err(AppError::Validation(format!(
                        "'{field}' is not a key field of '{}'",
                        schema.table_id
                    )));
                }
                decoded.push((field.to_string(), coerce_scalar(raw)));
            }
            // Reorder to schema key order; every key field must appear.
            let mut pairs = Vec::with_capacity(fields.len());
            for field in fields {
                let value = decoded
                    .iter()
                    .find(|(f, _)| f == field)
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| {
                        AppError::Validation(format!("missing key field '{field}'"))
                    })?;
                pairs.push((field.clone(), value));
            }
            Ok(RecordKey { pairs })
        }
    }
}

/// Render a scalar the way it appears in a key segment.
fn scalar_to_segment(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Encode a record's key as a raw (not yet percent-encoded) path segment.
/// Returns `None` when the record is missing a key field.
pub fn encode_key(schema: &TableSchema, record: &Value) -> Option<String> {
    let obj = record.as_object()?;
    match &schema.primary_key {
        PrimaryKey::Single(field) => scalar_to_segment(obj.get(field)?),
        PrimaryKey::Composite(fields) => {
            let mut parts = Vec::with_capacity(fields.len());
            for field in fields {
                let value = scalar_to_segment(obj.get(field)?)?;
                parts.push(format!("{field}={value}"));
            }
            Some(parts.join("|"))
        }
    }
}
