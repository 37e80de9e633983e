//! Static catalog of permitted tables. The registry is the sole authorization
//! boundary: only identifiers registered here are reachable from the API.

pub mod key;
pub mod tables;
pub mod types;

pub use key::{encode_key, parse_key_segment, RecordKey};
pub use tables::pharmacy_registry;
pub use types::{
    FieldDescriptor, FieldType, PrimaryKey, SortDirection, SortSpec, TableSchema,
};

use crate::error::RegistryError;
use std::collections::HashMap;

/// Immutable, process-wide table catalog. Built once at startup.
#[derive(Clone, Debug)]
pub struct TableRegistry {
    tables: Vec<TableSchema>,
    by_id: HashMap<String, usize>,
}

impl TableRegistry {
    /// Build a registry, checking schema invariants: unique identifiers, key
    /// fields declared, reference targets registered, display fields present.
    pub fn new(tables: Vec<TableSchema>) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::with_capacity(tables.len());
        for (i, schema) in tables.iter().enumerate() {
            if by_id.insert(schema.table_id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateTable(schema.table_id.clone()));
            }
            for pk in schema.primary_key.fields() {
                if !schema.has_field(pk) {
                    return Err(RegistryError::PrimaryKeyNotDeclared {
                        table: schema.table_id.clone(),
                        field: pk.to_string(),
                    });
                }
            }
        }
        for schema in &tables {
            for field in &schema.fields {
                let Some(target_id) = &field.references else {
                    continue;
                };
                let Some(&target_ix) = by_id.get(target_id.as_str()) else {
                    return Err(RegistryError::DanglingReference {
                        table: schema.table_id.clone(),
                        field: field.name.clone(),
                        target: target_id.clone(),
                    });
                };
                if let Some(display) = &field.display_field {
                    if !tables[target_ix].has_field(display) {
                        return Err(RegistryError::MissingDisplayField {
                            table: schema.table_id.clone(),
                            field: field.name.clone(),
                            target: target_id.clone(),
                            display: display.clone(),
                        });
                    }
                }
            }
        }
        Ok(TableRegistry { tables, by_id })
    }

    /// Look up a schema by its logical identifier.
    pub fn get(&self, table_id: &str) -> Option<&TableSchema> {
        self.by_id.get(table_id).map(|&i| &self.tables[i])
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::types::{FieldDescriptor, FieldType, PrimaryKey, TableSchema};
    use super::TableRegistry;
    use crate::error::RegistryError;

    fn minimal_table(id: &str) -> TableSchema {
        TableSchema {
            table_id: id.to_string(),
            table_name: id.to_uppercase(),
            label: id.to_string(),
            primary_key: PrimaryKey::Single("ID".into()),
            fields: vec![
                FieldDescriptor::new("ID", "Id", FieldType::Number).auto(),
                FieldDescriptor::new("NOMBRE", "Nombre", FieldType::String).required(),
            ],
            default_sort: None,
        }
    }

    #[test]
    fn lookup_by_identifier() {
        let reg = TableRegistry::new(vec![minimal_table("producto")]).unwrap();
        assert!(reg.get("producto").is_some());
        assert!(reg.get("PRODUCTO").is_none());
        assert!(reg.get("no_such_table").is_none());
    }

    #[test]
    fn rejects_undeclared_primary_key() {
        let mut t = minimal_table("producto");
        t.primary_key = PrimaryKey::Single("ID_PRODUCTO".into());
        let err = TableRegistry::new(vec![t]).unwrap_err();
        assert!(matches!(err, RegistryError::PrimaryKeyNotDeclared { .. }));
    }

    #[test]
    fn rejects_dangling_reference() {
        let mut t = minimal_table("venta");
        t.fields.push(
            FieldDescriptor::new("ID_CLIENTE", "Cliente", FieldType::Number)
                .references("cliente", "NOMBRE"),
        );
        let err = TableRegistry::new(vec![t]).unwrap_err();
        assert!(matches!(err, RegistryError::DanglingReference { .. }));
    }

    #[test]
    fn rejects_duplicate_identifier() {
        let err =
            TableRegistry::new(vec![minimal_table("cliente"), minimal_table("cliente")])
                .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTable(_)));
    }

    #[test]
    fn shipped_catalog_satisfies_invariants() {
        let reg = super::pharmacy_registry().expect("catalog must validate");
        assert!(reg.get("producto").is_some());
        assert!(reg.get("inventario_sucursal").is_some());
        let inventario = reg.get("inventario_sucursal").unwrap();
        assert!(inventario.primary_key.is_composite());
    }
}
