//! Convenient imports for typical `sqlish` usage.
//!
//! ```ignore
//! use sqlish::prelude::*;
//! ```

pub use crate::{
    Column, ColumnDef, Dialect, DialectRegistry, Direction, Filter, IndexOptions, SelectOptions,
    Sql, SqlStatement, SqlishError, SqlishResult, Value,
};
