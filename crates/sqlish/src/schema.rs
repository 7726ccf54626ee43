//! Per-table column validators.
//!
//! Registering a table with [`SchemaRegistry::on`] does two things:
//! - right-hand `table.column` strings naming a registered column are emitted
//!   as column references instead of quoted text;
//! - values written to a registered column by INSERT, REPLACE or UPDATE ... SET
//!   are passed through that column's validator first.

use crate::error::{SqlishError, SqlishResult};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validate (and possibly normalize) a value bound for a column.
pub type ColumnValidator = Arc<dyn Fn(&Value) -> SqlishResult<Value> + Send + Sync>;

/// Registry of table schemas.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<String, IndexMap<String, ColumnValidator>>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (table, columns) in &self.tables {
            map.entry(table, &columns.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl SchemaRegistry {
    /// Create a new empty schema registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the column validators for a table.
    pub fn on<K, I>(&mut self, table: impl Into<String>, columns: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ColumnValidator)>,
    {
        let columns = columns.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.tables.insert(table.into(), columns);
    }

    /// Register a table with no column validators, unless it is already known.
    pub(crate) fn ensure_table(&mut self, table: &str) {
        self.tables.entry(table.to_string()).or_default();
    }

    /// Check if a table has been registered.
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Returns `true` when `reference` is `table.column` and that column is
    /// registered.
    pub fn is_column_name(&self, reference: &str) -> bool {
        match reference.split_once('.') {
            Some((table, column)) if !table.is_empty() => self
                .tables
                .get(table)
                .is_some_and(|cols| cols.contains_key(column)),
            _ => false,
        }
    }

    /// Run a value through a column's validator.
    ///
    /// Fails with an injection error when the table is not registered.
    /// Columns without a validator pass the value through unchanged.
    pub fn apply_on(&self, table: &str, column: &str, value: &Value) -> SqlishResult<Value> {
        let Some(columns) = self.tables.get(table) else {
            return Err(SqlishError::injection(format!("{table}, {value}")));
        };
        match columns.get(column) {
            Some(validate) => validate(value),
            None => Ok(value.clone()),
        }
    }

    /// Validate a value if the table is registered; otherwise pass it through.
    pub(crate) fn check(&self, table: &str, column: &str, value: Value) -> SqlishResult<Value> {
        if self.has_table(table) {
            self.apply_on(table, column, &value)
        } else {
            Ok(value)
        }
    }
}

/// Wrap a closure as a [`ColumnValidator`].
pub fn validator<F>(f: F) -> ColumnValidator
where
    F: Fn(&Value) -> SqlishResult<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        let mut schemas = SchemaRegistry::new();
        schemas.on(
            "test",
            [
                ("id", validator(|v| match v {
                    Value::Int(i) if *i > 0 => Ok(v.clone()),
                    other => Err(SqlishError::injection(format!("test.id, {other}"))),
                })),
                ("name", validator(|v| Ok(v.clone()))),
            ],
        );
        schemas
    }

    #[test]
    fn recognizes_registered_columns() {
        let schemas = registry();
        assert!(schemas.is_column_name("test.id"));
        assert!(!schemas.is_column_name("test.missing"));
        assert!(!schemas.is_column_name("other.id"));
        assert!(!schemas.is_column_name("id"));
    }

    #[test]
    fn applies_validators() {
        let schemas = registry();
        assert_eq!(schemas.apply_on("test", "id", &Value::Int(3)).unwrap(), Value::Int(3));
        assert!(schemas.apply_on("test", "id", &Value::Int(-1)).is_err());
        assert!(schemas.apply_on("nope", "id", &Value::Int(1)).unwrap_err().is_injection());
    }

    #[test]
    fn unregistered_tables_pass_through() {
        let schemas = registry();
        assert_eq!(schemas.check("other", "id", Value::Int(-1)).unwrap(), Value::Int(-1));
    }

    #[test]
    fn ensure_table_keeps_existing_validators() {
        let mut schemas = registry();
        schemas.ensure_table("test");
        assert!(schemas.is_column_name("test.id"));
    }
}
