//! Schema types describing one logical table and its fields.

use serde::{Deserialize, Serialize};

/// Field value class. Drives input-widget choice on the dashboard and value
/// coercion on both ends of the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Decimal,
    Date,
}

/// One field of a logical table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Logical field identifier, used as JSON key and bind name.
    pub name: String,
    /// Physical column name when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Human label for the dashboard.
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Must be non-empty on create.
    #[serde(default)]
    pub required: bool,
    /// Database-generated; excluded from insert payloads.
    #[serde(default)]
    pub auto: bool,
    /// Identifier of the table whose primary key this field stores.
    /// Resolved for display only, never enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    /// Field of the referenced table shown in dropdowns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            column: None,
            label: label.to_string(),
            field_type,
            required: false,
            auto: false,
            references: None,
            display_field: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    pub fn references(mut self, table_id: &str, display_field: &str) -> Self {
        self.references = Some(table_id.to_string());
        self.display_field = Some(display_field.to_string());
        self
    }

    pub fn column(mut self, physical: &str) -> Self {
        self.column = Some(physical.to_string());
        self
    }

    /// Physical column name backing this field.
    pub fn physical_column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Default client-side ordering for a table. Never part of the SQL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Primary key: one field name, or an ordered set for composite keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Key field names in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            PrimaryKey::Single(f) => vec![f.as_str()],
            PrimaryKey::Composite(fs) => fs.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, PrimaryKey::Composite(_))
    }
}

/// Shape of one logical entity: physical table, key, ordered fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableSchema {
    /// Logical identifier, used as the URL path segment.
    pub table_id: String,
    /// Physical table name.
    pub table_name: String,
    pub label: String,
    pub primary_key: PrimaryKey,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,
}

impl TableSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn is_key_field(&self, name: &str) -> bool {
        self.primary_key.fields().contains(&name)
    }

    /// Fields eligible for insert payloads.
    pub fn insertable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.auto)
    }
}
