//! Dialect-aware SQL statement builder.
//!
//! [`Sql`] holds the cross-statement configuration (dialect, terminator, UTC
//! flag, schema registry) and one [`Statement`]. Verb methods replace the
//! statement; clause methods fill in its slots. Every method validates its
//! input first and returns `SqlishResult<&mut Sql>`, so a chain stops at the
//! first rejected argument and leaves the previous statement untouched.
//!
//! # Example
//!
//! ```ignore
//! use sqlish::prelude::*;
//!
//! let mut sql = Sql::new();
//! let text = sql
//!     .select(["id", "name", "email"])?
//!     .from("test1")?
//!     .where_(&Filter::field("id", 1))?
//!     .order_by("name", None)?
//!     .to_sql()?;
//! assert_eq!(text, "SELECT id, name, email FROM test1 WHERE id = 1 ORDER BY name;");
//! ```

mod clauses;
mod ddl;
mod render;
mod statement;
mod traits;
mod verbs;


pub use ddl::{ColumnDef, IndexOptions, SqlType};
pub use statement::{Column, Direction, Join, Order, Statement, Verb};
pub use traits::SqlStatement;
pub use verbs::{IntoColumns, SelectOptions};

use crate::dialect::{Call, ClauseMethod, Dialect, VerbMethod};
use crate::encode::{Encoder, sql_date};
use crate::error::SqlishResult;
use crate::expr::{Compiled, compile};
use crate::filter::Filter;
use crate::schema::{ColumnValidator, SchemaRegistry};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Default statement terminator.
pub const DEFAULT_EOL: &str = ";";

/// SQL statement builder.
#[derive(Debug, Clone)]
pub struct Sql {
    dialect: Arc<Dialect>,
    eol: String,
    use_utc: bool,
    schemas: SchemaRegistry,
    sql: Statement,
}

impl Default for Sql {
    fn default() -> Self {
        Self::new()
    }
}

impl Sql {
    /// Create a builder for the SQL 1992 baseline dialect.
    pub fn new() -> Self {
        Self::with_dialect(Arc::new(Dialect::sql92()))
    }

    /// Create a builder for a dialect.
    pub fn with_dialect(dialect: Arc<Dialect>) -> Self {
        Self {
            dialect,
            eol: DEFAULT_EOL.to_string(),
            use_utc: false,
            schemas: SchemaRegistry::new(),
            sql: Statement::default(),
        }
    }

    /// Switch dialects. Affects subsequent calls only.
    pub fn set_dialect(&mut self, dialect: Arc<Dialect>) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// The default terminator appended by `to_sql`.
    pub fn eol(&self) -> &str {
        &self.eol
    }

    pub fn set_eol(&mut self, eol: impl Into<String>) -> &mut Self {
        self.eol = eol.into();
        self
    }

    pub fn use_utc(&self) -> bool {
        self.use_utc
    }

    /// Render instants in UTC instead of local time.
    pub fn set_use_utc(&mut self, use_utc: bool) -> &mut Self {
        self.use_utc = use_utc;
        self
    }

    /// Register column validators for a table.
    ///
    /// Registered `table.column` strings on the right-hand side of filters are
    /// then emitted as column references, and values written to the table
    /// pass through the validators.
    pub fn on<K, I>(&mut self, table: impl Into<String>, columns: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ColumnValidator)>,
    {
        self.schemas.on(table, columns);
        self
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// The statement built so far.
    pub fn statement(&self) -> &Statement {
        &self.sql
    }

    /// An encoder bound to this builder's dialect family, UTC flag and schemas.
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(self.dialect.family())
            .use_utc(self.use_utc)
            .with_schemas(&self.schemas)
    }

    /// Encode a value as a SQL literal.
    pub fn safely(&self, value: &Value) -> SqlishResult<String> {
        self.encoder().safely(value)
    }

    /// Compile a filter expression.
    pub fn expr(&self, filter: &Filter) -> SqlishResult<Compiled> {
        compile(filter, &self.encoder())
    }

    /// Compile a filter expression wrapped in parentheses.
    pub fn p(&self, filter: &Filter) -> SqlishResult<String> {
        Ok(format!("({})", self.expr(filter)?.into_clause()?))
    }

    /// Format an instant the way this builder encodes dates (unquoted).
    pub fn sql_date(&self, d: &DateTime<Utc>) -> String {
        sql_date(d, self.use_utc)
    }

    /// Run a dialect's verb override, if it has one. Returns `true` when the
    /// call was handled.
    fn delegate_verb(&mut self, verb: VerbMethod, call: &Call<'_>) -> SqlishResult<bool> {
        match self.dialect.gate_verb(verb)? {
            Some(f) => {
                f(&mut self.sql, call)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run a dialect's clause override, if it has one. Returns `true` when
    /// the call was handled.
    fn delegate_clause(&mut self, clause: ClauseMethod, call: &Call<'_>) -> SqlishResult<bool> {
        match self.dialect.gate_clause(clause)? {
            Some(f) => {
                f(&mut self.sql, call)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
