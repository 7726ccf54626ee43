//! SQL dialects and capability gating.
//!
//! A [`Dialect`] maps every builder method to a [`Support`] entry. Before doing
//! anything, each method consults its entry:
//!
//! - [`Support::Custom`] replaces the built-in behavior entirely;
//! - [`Support::Unsupported`] fails with "`<method>` not supported by `<dialect>`";
//! - [`Support::Supported`] (or no entry) runs the built-in logic.
//!
//! The built-in profiles live in a [`DialectRegistry`], which can be extended
//! at runtime with [`DialectRegistry::define`].

use crate::error::{SqlishError, SqlishResult};
use crate::filter::Filter;
use crate::sql::{Column, ColumnDef, Direction, IndexOptions, SelectOptions, Sql, Statement};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Dialect family, used for quoting rules and the few behaviors that are tied
/// to a specific database rather than to the capability tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// SQL-92 baseline.
    #[default]
    Standard,
    /// MySQL: standalone `SET` targets `@variables`.
    MySql,
    /// PostgreSQL: no `REPLACE`.
    #[serde(alias = "postgres")]
    PostgreSql,
    /// SQLite: `''` quote escaping, no `SET @var`, no `INTO`.
    Sqlite,
}

/// Verb methods a dialect can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerbMethod {
    CreateTable,
    DropTable,
    CreateIndex,
    DropIndex,
    CreateView,
    DropView,
    Insert,
    Update,
    Replace,
    DeleteFrom,
    Select,
    Set,
    Union,
}

impl VerbMethod {
    /// Method name as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTable => "createTable",
            Self::DropTable => "dropTable",
            Self::CreateIndex => "createIndex",
            Self::DropIndex => "dropIndex",
            Self::CreateView => "createView",
            Self::DropView => "dropView",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::DeleteFrom => "deleteFrom",
            Self::Select => "select",
            Self::Set => "set",
            Self::Union => "union",
        }
    }
}

/// Clause methods a dialect can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClauseMethod {
    Set,
    From,
    Join,
    Where,
    Limit,
    Offset,
    Order,
    Group,
    Into,
}

impl ClauseMethod {
    /// Clause name as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::From => "from",
            Self::Join => "join",
            Self::Where => "where",
            Self::Limit => "limit",
            Self::Offset => "offset",
            Self::Order => "order",
            Self::Group => "group",
            Self::Into => "into",
        }
    }
}

/// The arguments of a gated builder call, handed to [`Support::Custom`]
/// overrides.
#[derive(Debug)]
pub enum Call<'a> {
    CreateTable {
        name: &'a str,
        columns: &'a [(String, ColumnDef)],
    },
    DropTable {
        name: &'a str,
    },
    CreateIndex {
        name: &'a str,
        options: &'a IndexOptions,
    },
    DropIndex {
        name: &'a str,
    },
    CreateView {
        name: &'a str,
        view: &'a Sql,
    },
    DropView {
        name: &'a str,
    },
    Insert {
        table: &'a str,
        row: &'a [(String, Value)],
    },
    Replace {
        table: &'a str,
        row: &'a [(String, Value)],
    },
    Update {
        table: &'a str,
    },
    DeleteFrom {
        table: &'a str,
    },
    Select {
        columns: &'a [Column],
        options: SelectOptions,
    },
    Set {
        values: &'a [(String, Value)],
    },
    Union {
        left: &'a Sql,
        right: &'a Sql,
    },
    From {
        tables: &'a [String],
    },
    Join {
        tables: &'a [String],
        on: &'a Filter,
    },
    Where {
        filter: &'a Filter,
    },
    Limit {
        index: u64,
        count: Option<u64>,
    },
    Offset {
        index: u64,
    },
    Order {
        fields: &'a [String],
        direction: Option<Direction>,
    },
    Group {
        fields: &'a [String],
    },
    Into {
        targets: &'a [String],
    },
}

/// A dialect-supplied replacement for a builder method.
pub type Override = Arc<dyn Fn(&mut Statement, &Call<'_>) -> SqlishResult<()> + Send + Sync>;

/// How a dialect handles one builder method.
#[derive(Clone, Default)]
pub enum Support {
    /// Run the built-in logic.
    #[default]
    Supported,
    /// Refuse the call.
    Unsupported,
    /// Delegate entirely to a custom function.
    Custom(Override),
}

impl fmt::Debug for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supported => f.write_str("Supported"),
            Self::Unsupported => f.write_str("Unsupported"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<bool> for Support {
    fn from(supported: bool) -> Self {
        if supported {
            Support::Supported
        } else {
            Support::Unsupported
        }
    }
}

/// An immutable, named SQL capability profile.
#[derive(Debug, Clone)]
pub struct Dialect {
    name: String,
    description: String,
    family: Family,
    verbs: HashMap<VerbMethod, Support>,
    clauses: HashMap<ClauseMethod, Support>,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl Dialect {
    /// Start defining a dialect. Everything is supported until disabled.
    pub fn builder(name: impl Into<String>) -> DialectBuilder {
        let name = name.into();
        DialectBuilder {
            dialect: Dialect {
                description: name.clone(),
                name,
                family: Family::Standard,
                verbs: HashMap::new(),
                clauses: HashMap::new(),
            },
        }
    }

    /// SQL 1992 baseline: everything supported.
    pub fn sql92() -> Self {
        Self::builder("SQL92").description("SQL 1992").build()
    }

    /// SQLite 3: no standalone `SET`, no `INTO`, `''` quote escaping.
    pub fn sqlite3() -> Self {
        Self::builder("SQLite3")
            .description("SQLite 3")
            .family(Family::Sqlite)
            .verb(VerbMethod::Set, Support::Unsupported)
            .clause(ClauseMethod::Into, Support::Unsupported)
            .build()
    }

    /// MySQL 5.5: standalone `SET` targets `@variables`.
    pub fn mysql55() -> Self {
        Self::builder("MySQL55")
            .description("MySQL 5.5")
            .family(Family::MySql)
            .build()
    }

    /// PostgreSQL 9.2: no `REPLACE`; `limit` is handled by a custom override.
    pub fn postgresql92() -> Self {
        Self::builder("PostgreSQL92")
            .description("PostgreSQL 9.2")
            .family(Family::PostgreSql)
            .verb(VerbMethod::Replace, Support::Unsupported)
            .clause(ClauseMethod::Limit, Support::Custom(Arc::new(postgres_limit)))
            .build()
    }

    /// Registry name, e.g. `SQLite3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description, e.g. `SQLite 3`.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Support entry for a verb method (absent entries are supported).
    pub fn verb_support(&self, verb: VerbMethod) -> &Support {
        self.verbs.get(&verb).unwrap_or(&Support::Supported)
    }

    /// Support entry for a clause method (absent entries are supported).
    pub fn clause_support(&self, clause: ClauseMethod) -> &Support {
        self.clauses.get(&clause).unwrap_or(&Support::Supported)
    }

    /// Resolve the gate for a verb: `Ok(Some(f))` means delegate to `f`.
    pub(crate) fn gate_verb(&self, verb: VerbMethod) -> SqlishResult<Option<Override>> {
        match self.verb_support(verb) {
            Support::Supported => Ok(None),
            Support::Unsupported => Err(SqlishError::unsupported(format!(
                "{} not supported by {}",
                verb.name(),
                self
            ))),
            Support::Custom(f) => Ok(Some(f.clone())),
        }
    }

    /// Resolve the gate for a clause: `Ok(Some(f))` means delegate to `f`.
    pub(crate) fn gate_clause(&self, clause: ClauseMethod) -> SqlishResult<Option<Override>> {
        match self.clause_support(clause) {
            Support::Supported => Ok(None),
            Support::Unsupported => Err(SqlishError::unsupported(format!(
                "{} clause not supported by {}",
                clause.name(),
                self
            ))),
            Support::Custom(f) => Ok(Some(f.clone())),
        }
    }
}

/// PostgreSQL writes paging as `LIMIT count OFFSET index`.
fn postgres_limit(stmt: &mut Statement, call: &Call<'_>) -> SqlishResult<()> {
    let Call::Limit { index, count } = call else {
        return Err(SqlishError::malformed("limit override called for another clause"));
    };
    match count {
        None => stmt.limit = Some(*index),
        Some(count) => {
            stmt.limit = Some(*count);
            stmt.offset = Some(*index);
        }
    }
    Ok(())
}

/// Builder for custom dialects.
///
/// # Example
/// ```ignore
/// use sqlish::{ClauseMethod, Dialect, Family, VerbMethod};
///
/// let readonly = Dialect::builder("ReadOnly")
///     .based_on(&Dialect::sqlite3())
///     .disable_verb(VerbMethod::Insert)
///     .disable_verb(VerbMethod::Update)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl DialectBuilder {
    /// Copy the family and every support entry from another dialect.
    pub fn based_on(mut self, base: &Dialect) -> Self {
        self.dialect.family = base.family;
        self.dialect.verbs = base.verbs.clone();
        self.dialect.clauses = base.clauses.clone();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.dialect.description = description.into();
        self
    }

    pub fn family(mut self, family: Family) -> Self {
        self.dialect.family = family;
        self
    }

    /// Set the support entry for a verb method.
    pub fn verb(mut self, verb: VerbMethod, support: impl Into<Support>) -> Self {
        self.dialect.verbs.insert(verb, support.into());
        self
    }

    /// Set the support entry for a clause method.
    pub fn clause(mut self, clause: ClauseMethod, support: impl Into<Support>) -> Self {
        self.dialect.clauses.insert(clause, support.into());
        self
    }

    pub fn disable_verb(self, verb: VerbMethod) -> Self {
        self.verb(verb, Support::Unsupported)
    }

    pub fn disable_clause(self, clause: ClauseMethod) -> Self {
        self.clause(clause, Support::Unsupported)
    }

    /// Replace a verb method with a custom function.
    pub fn override_verb<F>(self, verb: VerbMethod, f: F) -> Self
    where
        F: Fn(&mut Statement, &Call<'_>) -> SqlishResult<()> + Send + Sync + 'static,
    {
        self.verb(verb, Support::Custom(Arc::new(f)))
    }

    /// Replace a clause method with a custom function.
    pub fn override_clause<F>(self, clause: ClauseMethod, f: F) -> Self
    where
        F: Fn(&mut Statement, &Call<'_>) -> SqlishResult<()> + Send + Sync + 'static,
    {
        self.clause(clause, Support::Custom(Arc::new(f)))
    }

    pub fn build(self) -> Dialect {
        self.dialect
    }
}

/// Named dialects available to builders.
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: IndexMap<String, Arc<Dialect>>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    /// Create a registry holding the built-in dialects.
    pub fn new() -> Self {
        let mut registry = Self {
            dialects: IndexMap::new(),
        };
        for dialect in [
            Dialect::sql92(),
            Dialect::sqlite3(),
            Dialect::mysql55(),
            Dialect::postgresql92(),
        ] {
            registry.define(dialect);
        }
        registry
    }

    /// Register a dialect under its name, replacing any previous definition.
    pub fn define(&mut self, dialect: Dialect) -> Arc<Dialect> {
        let dialect = Arc::new(dialect);
        self.dialects
            .insert(dialect.name.clone(), Arc::clone(&dialect));
        dialect
    }

    /// Look up a dialect by name.
    pub fn get(&self, name: &str) -> Option<Arc<Dialect>> {
        self.dialects.get(name).cloned()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dialects.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = DialectRegistry::new();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["SQL92", "SQLite3", "MySQL55", "PostgreSQL92"]);
        assert_eq!(registry.get("MySQL55").unwrap().to_string(), "MySQL 5.5");
        assert!(registry.get("Oracle").is_none());
    }

    #[test]
    fn absent_entries_are_supported() {
        let d = Dialect::sql92();
        assert!(matches!(d.verb_support(VerbMethod::Replace), Support::Supported));
        assert!(d.gate_verb(VerbMethod::Replace).unwrap().is_none());
    }

    #[test]
    fn unsupported_entries_name_the_dialect() {
        let err = Dialect::postgresql92()
            .gate_verb(VerbMethod::Replace)
            .err().unwrap();
        assert_eq!(err.to_string(), "replace not supported by PostgreSQL 9.2");

        let err = Dialect::sqlite3().gate_clause(ClauseMethod::Into).err().unwrap();
        assert_eq!(err.to_string(), "into clause not supported by SQLite 3");
    }

    #[test]
    fn custom_entries_are_returned() {
        assert!(
            Dialect::postgresql92()
                .gate_clause(ClauseMethod::Limit)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn based_on_copies_profile() {
        let d = Dialect::builder("Lite")
            .based_on(&Dialect::sqlite3())
            .disable_verb(VerbMethod::Insert)
            .build();
        assert_eq!(d.family(), Family::Sqlite);
        assert!(d.gate_verb(VerbMethod::Set).is_err());
        assert!(d.gate_verb(VerbMethod::Insert).is_err());
        assert!(d.gate_verb(VerbMethod::Select).unwrap().is_none());
    }

    #[test]
    fn define_replaces_by_name() {
        let mut registry = DialectRegistry::new();
        registry.define(Dialect::builder("SQL92").description("strict").build());
        assert_eq!(registry.get("SQL92").unwrap().description(), "strict");
        assert_eq!(registry.names().count(), 4);
    }
}
