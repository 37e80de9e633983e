//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a table schema.

use crate::error::AppError;
use crate::registry::{FieldDescriptor, FieldType, RecordKey, TableSchema};
use crate::sql::params::BindValue;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from the registry).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Placeholder with a SQL cast where the bound text needs one.
fn placeholder(n: usize, field_type: FieldType) -> String {
    match field_type {
        FieldType::Date => format!("${n}::date"),
        FieldType::Decimal => format!("${n}::numeric"),
        FieldType::String | FieldType::Number => format!("${n}"),
    }
}

/// SELECT list: physical column aliased to the logical name when they differ;
/// numeric columns cast to text so sqlx rows decode without a decimal type.
fn select_column_list(schema: &TableSchema) -> String {
    schema
        .fields
        .iter()
        .map(|f| {
            let col = quoted(f.physical_column());
            let expr = if f.field_type == FieldType::Decimal {
                format!("{col}::text")
            } else {
                col
            };
            if f.physical_column() == f.name && f.field_type != FieldType::Decimal {
                expr
            } else {
                format!("{expr} AS {}", quoted(&f.name))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn where_key(q: &mut QueryBuf, schema: &TableSchema, key: &RecordKey) -> Result<String, AppError> {
    let mut parts = Vec::with_capacity(key.pairs().len());
    for (field, value) in key.pairs() {
        let desc = schema
            .field(field)
            .ok_or_else(|| AppError::Validation(format!("unknown key field '{field}'")))?;
        let bind = BindValue::from_field(field, desc.field_type, value)?;
        let n = q.push_param(bind);
        parts.push(format!(
            "{} = {}",
            quoted(desc.physical_column()),
            placeholder(n, desc.field_type)
        ));
    }
    Ok(parts.join(" AND "))
}

/// `SELECT <mapped columns> FROM <table>`: the full row set; ordering is
/// whatever the database returns (default sort is applied client-side).
pub fn select_all(schema: &TableSchema) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        select_column_list(schema),
        quoted(&schema.table_name)
    );
    q
}

/// INSERT from the body's declared non-auto fields. The caller rejects an
/// empty column set before building.
pub fn insert(schema: &TableSchema, body: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in schema.insertable_fields() {
        let Some(value) = body.get(&f.name) else {
            continue;
        };
        let bind = BindValue::from_field(&f.name, f.field_type, value)?;
        let n = q.push_param(bind);
        cols.push(quoted(f.physical_column()));
        placeholders.push(placeholder(n, f.field_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&schema.table_name),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// Fields of the body that an UPDATE would SET: declared, non-key, present.
pub fn updatable_fields<'a>(
    schema: &'a TableSchema,
    body: &Map<String, Value>,
) -> Vec<&'a FieldDescriptor> {
    schema
        .fields
        .iter()
        .filter(|f| !schema.is_key_field(&f.name) && body.contains_key(&f.name))
        .collect()
}

/// UPDATE by key: SET only non-key declared fields present in the body. The
/// caller treats an empty SET as a no-op and never builds the statement.
pub fn update(
    schema: &TableSchema,
    key: &RecordKey,
    body: &Map<String, Value>,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in updatable_fields(schema, body) {
        let bind = BindValue::from_field(&f.name, f.field_type, &body[&f.name])?;
        let n = q.push_param(bind);
        sets.push(format!(
            "{} = {}",
            quoted(f.physical_column()),
            placeholder(n, f.field_type)
        ));
    }
    let set_clause = sets.join(", ");
    let where_clause = where_key(&mut q, schema, key)?;
    q.sql = format!(
        "UPDATE {} SET {} WHERE {}",
        quoted(&schema.table_name),
        set_clause,
        where_clause
    );
    Ok(q)
}

/// DELETE by key.
pub fn delete(schema: &TableSchema, key: &RecordKey) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let where_clause = where_key(&mut q, schema, key)?;
    q.sql = format!(
        "DELETE FROM {} WHERE {}",
        quoted(&schema.table_name),
        where_clause
    );
    Ok(q)
}
