//! # sqlish
//!
//! A dialect-aware SQL statement builder.
//!
//! ## Features
//!
//! - **Injection-safe by construction**: every name is checked against an
//!   allow-list and every value is encoded as a literal; anything else fails
//! - **Mongo-style filters**: `{"$or": [{"a": 1}, {"a": {"$gt": 2}}]}` compiles
//!   to `a = 1 OR a > 2`
//! - **Dialects**: SQL 92, SQLite 3, MySQL 5.5 and PostgreSQL 9.2 built in,
//!   with per-method gating and overrides for your own
//! - **Schema validators**: register per-column checks that run on every write
//! - **No database**: output is SQL text; `execute()` always fails
//!
//! ## Example
//!
//! ```ignore
//! use sqlish::prelude::*;
//! use std::sync::Arc;
//!
//! let mut sql = Sql::new();
//!
//! // INSERT
//! let s = sql
//!     .insert("test1", [("id", Value::from(1)), ("name", "Fred".into())])?
//!     .to_sql()?;
//! assert_eq!(s, r#"INSERT INTO test1 (id, name) VALUES (1, "Fred");"#);
//!
//! // SELECT
//! let s = sql
//!     .select(["id", "name"])?
//!     .from("test1")?
//!     .where_(&Filter::nested("id", Filter::eq_any([1, 2, 3])))?
//!     .to_sql()?;
//! assert_eq!(s, "SELECT id, name FROM test1 WHERE (id = 1 OR id = 2 OR id = 3);");
//!
//! // UPDATE
//! sql.update("test1")?
//!     .set("name", "George")?
//!     .where_(&Filter::field("id", 1))?;
//!
//! // Dialects
//! let mut lite = Sql::with_dialect(Arc::new(Dialect::sqlite3()));
//! assert!(lite.set("x", 1).is_err());
//! ```

pub mod config;
pub mod dialect;
pub mod encode;
pub mod error;
pub mod expr;
pub mod filter;
pub mod func;
pub mod ident;
pub mod prelude;
pub mod schema;
pub mod sql;
pub mod value;

pub use config::{Config, DialectDef};
pub use dialect::{
    Call, ClauseMethod, Dialect, DialectBuilder, DialectRegistry, Family, Override, Support,
    VerbMethod,
};
pub use encode::{Encoder, format_datetime, safely, sql_date};
pub use error::{SqlishError, SqlishResult};
pub use expr::{Compiled, expr, p, re_to_sql_wildcard};
pub use filter::{CmpOp, Filter, Operand, Pattern};
pub use func::safe_func;
pub use ident::{IntoNames, NameOptions, is_safe_name, require_name, safe_name};
pub use schema::{ColumnValidator, SchemaRegistry, validator};
pub use sql::{
    Column, ColumnDef, Direction, IndexOptions, IntoColumns, SelectOptions, Sql, SqlStatement,
    SqlType, Statement, Verb,
};
pub use value::{Value, row_from_json};
