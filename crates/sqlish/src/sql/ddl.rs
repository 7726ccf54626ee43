//! Table and index definitions.

use crate::encode::Encoder;
use crate::error::{SqlishError, SqlishResult};
use crate::ident::{IntoNames, NameOptions, require_name};
use crate::value::Value;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Column types accepted by `create_table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Int,
    Varchar,
    Char,
    Date,
    Time,
    DateTime,
    Timestamp,
    TinyText,
    Text,
    MediumText,
    LongText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
}

impl SqlType {
    pub fn keyword(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Int => "INT",
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::DateTime => "DATETIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::TinyText => "TINYTEXT",
            SqlType::Text => "TEXT",
            SqlType::MediumText => "MEDIUMTEXT",
            SqlType::LongText => "LONGTEXT",
            SqlType::TinyBlob => "TINYBLOB",
            SqlType::Blob => "BLOB",
            SqlType::MediumBlob => "MEDIUMBLOB",
            SqlType::LongBlob => "LONGBLOB",
        }
    }

    /// `INTEGER` or `INT`.
    pub fn is_integer(&self) -> bool {
        matches!(self, SqlType::Integer | SqlType::Int)
    }

    /// `VARCHAR` or `CHAR`, which take an optional length.
    pub fn takes_length(&self) -> bool {
        matches!(self, SqlType::Varchar | SqlType::Char)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SqlType {
    type Err = SqlishError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.to_ascii_uppercase().as_str() {
            "INTEGER" => SqlType::Integer,
            "INT" => SqlType::Int,
            "VARCHAR" => SqlType::Varchar,
            "CHAR" => SqlType::Char,
            "DATE" => SqlType::Date,
            "TIME" => SqlType::Time,
            "DATETIME" => SqlType::DateTime,
            "TIMESTAMP" => SqlType::Timestamp,
            "TINYTEXT" => SqlType::TinyText,
            "TEXT" => SqlType::Text,
            "MEDIUMTEXT" => SqlType::MediumText,
            "LONGTEXT" => SqlType::LongText,
            "TINYBLOB" => SqlType::TinyBlob,
            "BLOB" => SqlType::Blob,
            "MEDIUMBLOB" => SqlType::MediumBlob,
            "LONGBLOB" => SqlType::LongBlob,
            _ => return Err(SqlishError::malformed(format!("{s} not supported"))),
        };
        Ok(t)
    }
}

/// A column definition for `create_table`.
///
/// Deserializes from the same shape as a JSON/TOML table definition:
/// `{ type = "VARCHAR", length = 255, not_null = true }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnDef {
    /// Type name, checked against [`SqlType`] when the table is created.
    #[serde(rename = "type")]
    pub sql_type: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, deserialize_with = "deserialize_default")]
    pub default: Option<Value>,
    #[serde(default)]
    pub not_null: bool,
}

fn deserialize_default<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    raw.map(|v| Value::from_json(&v).map_err(serde::de::Error::custom))
        .transpose()
}

impl ColumnDef {
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            length: None,
            auto_increment: false,
            primary_key: false,
            default: None,
            not_null: false,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Render `column TYPE[(n)] [AUTO_INCREMENT] [PRIMARY KEY] [DEFAULT v] [NOT NULL]`.
    pub(crate) fn render(&self, column: &str, enc: &Encoder<'_>) -> SqlishResult<String> {
        let column = require_name(column, NameOptions::NONE)?;
        let sql_type: SqlType = self.sql_type.parse().map_err(|_| {
            SqlishError::malformed(format!("{column} of {} not supported", self.sql_type))
        })?;

        let mut parts = Vec::with_capacity(5);
        match self.length {
            Some(n) if sql_type.takes_length() => parts.push(format!("{sql_type}({n})")),
            Some(_) => {
                return Err(SqlishError::malformed(format!(
                    "{column} of {sql_type} takes no length"
                )));
            }
            None => parts.push(sql_type.to_string()),
        }
        if self.auto_increment {
            if !sql_type.is_integer() {
                return Err(SqlishError::malformed(format!(
                    "{column} of {sql_type} cannot be AUTO_INCREMENT"
                )));
            }
            parts.push("AUTO_INCREMENT".to_string());
        }
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if let Some(default) = &self.default {
            parts.push(format!("DEFAULT {}", enc.safely(default)?));
        }
        if self.not_null {
            parts.push("NOT NULL".to_string());
        }
        Ok(format!("{column} {}", parts.join(" ")))
    }
}

/// Options for `create_index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexOptions {
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl IndexOptions {
    /// An index on `table (columns)`.
    pub fn on(table: impl Into<String>, columns: impl IntoNames) -> Self {
        Self {
            unique: false,
            table: Some(table.into()),
            columns: columns.into_names(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Family;

    fn render(column: &str, def: &ColumnDef) -> SqlishResult<String> {
        def.render(column, &Encoder::default())
    }

    #[test]
    fn parses_types_case_insensitively() {
        assert_eq!("varchar".parse::<SqlType>().unwrap(), SqlType::Varchar);
        assert_eq!("LongBlob".parse::<SqlType>().unwrap(), SqlType::LongBlob);
        assert!("GEOMETRY".parse::<SqlType>().unwrap_err().is_malformed());
    }

    #[test]
    fn fragments_in_order() {
        let def = ColumnDef::new("integer")
            .auto_increment()
            .primary_key()
            .default_value(0)
            .not_null();
        assert_eq!(
            render("id", &def).unwrap(),
            "id INTEGER AUTO_INCREMENT PRIMARY KEY DEFAULT 0 NOT NULL"
        );
    }

    #[test]
    fn lengths() {
        assert_eq!(render("name", &ColumnDef::new("VARCHAR").length(255)).unwrap(), "name VARCHAR(255)");
        assert_eq!(render("name", &ColumnDef::new("char")).unwrap(), "name CHAR");
        assert!(render("n", &ColumnDef::new("INT").length(4)).unwrap_err().is_malformed());
    }

    #[test]
    fn defaults_are_encoded() {
        let def = ColumnDef::new("TEXT").default_value("it's");
        assert_eq!(render("note", &def).unwrap(), r#"note TEXT DEFAULT "it\'s""#);
        let sqlite = Encoder::new(Family::Sqlite);
        assert_eq!(def.render("note", &sqlite).unwrap(), r#"note TEXT DEFAULT "it''s""#);
    }

    #[test]
    fn unsupported_type_names_the_column() {
        let err = render("shape", &ColumnDef::new("GEOMETRY")).unwrap_err();
        assert_eq!(err.to_string(), "shape of GEOMETRY not supported");
    }

    #[test]
    fn auto_increment_needs_integer() {
        assert!(render("d", &ColumnDef::new("DATE").auto_increment()).is_err());
    }

    #[test]
    fn column_names_are_checked() {
        assert!(render("id;DROP", &ColumnDef::new("INT")).unwrap_err().is_injection());
    }

    #[test]
    fn deserializes_from_json() {
        let def: ColumnDef = serde_json::from_value(serde_json::json!({
            "type": "VARCHAR",
            "length": 64,
            "default": "none",
            "not_null": true
        }))
        .unwrap();
        assert_eq!(def.length, Some(64));
        assert_eq!(def.default, Some(Value::Text("none".into())));
        assert!(def.not_null && !def.primary_key);
    }
}
