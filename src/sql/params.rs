//! Convert JSON field values to types that sqlx can bind.

use crate::error::AppError;
use crate::registry::FieldType;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to one placeholder. Converted from JSON at the request
/// boundary, validated against the field's declared type.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl BindValue {
    /// Coerce a JSON value for a field of the given type. Blank strings are
    /// treated as SQL NULL for non-string fields (the dashboard sends "" for
    /// cleared inputs).
    pub fn from_field(field: &str, field_type: FieldType, v: &Value) -> Result<Self, AppError> {
        match (field_type, v) {
            (_, Value::Null) => Ok(BindValue::Null),
            (FieldType::String, Value::String(s)) => Ok(BindValue::Text(s.clone())),
            (FieldType::String, Value::Number(n)) => Ok(BindValue::Text(n.to_string())),
            (FieldType::String, Value::Bool(b)) => Ok(BindValue::Bool(*b)),
            (FieldType::Number | FieldType::Decimal, Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Ok(BindValue::Int(i))
                } else {
                    Ok(BindValue::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            (FieldType::Number | FieldType::Decimal, Value::String(s)) => {
                if s.trim().is_empty() {
                    return Ok(BindValue::Null);
                }
                if let Ok(i) = s.parse::<i64>() {
                    Ok(BindValue::Int(i))
                } else if let Ok(f) = s.parse::<f64>() {
                    Ok(BindValue::Float(f))
                } else {
                    Err(AppError::Validation(format!(
                        "{field} must be numeric, got '{s}'"
                    )))
                }
            }
            (FieldType::Date, Value::String(s)) => {
                if s.trim().is_empty() {
                    Ok(BindValue::Null)
                } else {
                    // Calendar-date prefix; the statement casts with ::date.
                    Ok(BindValue::Text(s.chars().take(10).collect()))
                }
            }
            (_, other) => Err(AppError::Validation(format!(
                "unsupported value for {field}: {other}"
            ))),
        }
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            BindValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Null => PgTypeInfo::with_name("TEXT"),
            BindValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            BindValue::Int(_) => PgTypeInfo::with_name("INT8"),
            BindValue::Float(_) => PgTypeInfo::with_name("FLOAT8"),
            BindValue::Text(_) => PgTypeInfo::with_name("TEXT"),
        })
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_string_becomes_null_for_dates_and_numbers() {
        let v = BindValue::from_field("FECHA", FieldType::Date, &json!("")).unwrap();
        assert_eq!(v, BindValue::Null);
        let v = BindValue::from_field("PRECIO", FieldType::Decimal, &json!("")).unwrap();
        assert_eq!(v, BindValue::Null);
    }

    #[test]
    fn date_truncated_to_calendar_day() {
        let v =
            BindValue::from_field("FECHA", FieldType::Date, &json!("2024-05-01T10:30:00Z"))
                .unwrap();
        assert_eq!(v, BindValue::Text("2024-05-01".into()));
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let v = BindValue::from_field("PRECIO", FieldType::Decimal, &json!("12.5")).unwrap();
        assert_eq!(v, BindValue::Float(12.5));
        let err = BindValue::from_field("PRECIO", FieldType::Decimal, &json!("doce"));
        assert!(err.is_err());
    }
}
