//! Literal encoding.
//!
//! [`Encoder::safely`] turns a [`Value`] into SQL literal text: numbers and
//! booleans unquoted, text escaped and double quoted, dates formatted, and
//! known `table.column` references or `@variables` passed through as names.

use crate::dialect::Family;
use crate::error::{SqlishError, SqlishResult};
use crate::ident::{NameOptions, is_safe_name};
use crate::schema::SchemaRegistry;
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Format a wall-clock date/time: `YYYY-MM-DD` at exact midnight,
/// `YYYY-MM-DD HH:MM:SS` otherwise.
pub fn format_datetime(d: &NaiveDateTime) -> String {
    if d.hour() == 0 && d.minute() == 0 && d.second() == 0 && d.nanosecond() == 0 {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Format an instant as a SQL date, in UTC or in local time.
pub fn sql_date(d: &DateTime<Utc>, use_utc: bool) -> String {
    if use_utc {
        format_datetime(&d.naive_utc())
    } else {
        format_datetime(&d.with_timezone(&chrono::Local).naive_local())
    }
}

/// Escape text for a double-quoted literal.
fn escape_into(out: &mut String, s: &str, family: Family) {
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\u{1a}' => out.push_str("\\Z"),
            '\'' if family == Family::Sqlite => out.push_str("''"),
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

fn quote(s: &str, family: Family) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    escape_into(&mut out, s, family);
    out.push('"');
    out
}

/// Encodes values for one dialect family, optionally consulting a schema
/// registry for column references.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder<'a> {
    family: Family,
    use_utc: bool,
    schemas: Option<&'a SchemaRegistry>,
}

impl<'a> Encoder<'a> {
    /// Create an encoder for a dialect family.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            use_utc: false,
            schemas: None,
        }
    }

    /// Render instants in UTC instead of local time.
    pub fn use_utc(mut self, use_utc: bool) -> Self {
        self.use_utc = use_utc;
        self
    }

    /// Recognize registered `table.column` strings as column references.
    pub fn with_schemas(mut self, schemas: &'a SchemaRegistry) -> Self {
        self.schemas = Some(schemas);
        self
    }

    /// Encode a value as SQL literal text.
    pub fn safely(&self, value: &Value) -> SqlishResult<String> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(true) => Ok("true".to_string()),
            Value::Bool(false) => Ok("false".to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) if f.is_finite() => Ok(f.to_string()),
            Value::Float(f) => Err(SqlishError::injection(f.to_string())),
            Value::Text(s) => self.text(s),
            Value::DateTime(d) => Ok(quote(&sql_date(d, self.use_utc), self.family)),
            Value::Naive(d) => Ok(quote(&format_datetime(d), self.family)),
            Value::Column(c) => Ok(c.clone()),
        }
    }

    fn text(&self, s: &str) -> SqlishResult<String> {
        let s = s.trim();
        if self.schemas.is_some_and(|schemas| schemas.is_column_name(s)) {
            return Ok(s.to_string());
        }
        if s.starts_with('@') {
            if is_safe_name(s, NameOptions::VARIABLE) {
                return Ok(s.to_string());
            }
            return Err(SqlishError::injection(s));
        }
        if s.is_empty() || s == "\"\"" {
            return Ok("\"\"".to_string());
        }
        Ok(quote(s, self.family))
    }
}

/// Encode a value with the standard dialect rules and no schema registry.
pub fn safely(value: &Value) -> SqlishResult<String> {
    Encoder::default().safely(value)
}
