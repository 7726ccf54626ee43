//! Verb methods. Each one starts a new statement.

use super::statement::{Column, Statement, Verb};
use super::traits::SqlStatement;
use super::{ColumnDef, IndexOptions, Sql};
use crate::dialect::{Call, ClauseMethod, Family, VerbMethod};
use crate::error::{SqlishError, SqlishResult};
use crate::func::is_safe_func;
use crate::ident::{NameOptions, is_safe_name, require_name, require_names};
use crate::value::Value;

/// `SELECT DISTINCT` / `SELECT ALL` switches. `all` wins when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub distinct: bool,
    pub all: bool,
}

impl SelectOptions {
    pub fn distinct() -> Self {
        Self {
            distinct: true,
            all: false,
        }
    }

    pub fn all() -> Self {
        Self {
            distinct: false,
            all: true,
        }
    }

    fn verb(&self) -> Verb {
        if self.all {
            Verb::SelectAll
        } else if self.distinct {
            Verb::SelectDistinct
        } else {
            Verb::Select
        }
    }
}

/// Convert an input into selected columns. An empty list selects `*`.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Column>;
}

impl IntoColumns for () {
    fn into_columns(self) -> Vec<Column> {
        Vec::new()
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<Column> {
        vec![Column::from(self)]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<Column> {
        vec![Column::from(self)]
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Vec<Column> {
        vec![self]
    }
}

impl IntoColumns for Vec<Column> {
    fn into_columns(self) -> Vec<Column> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<Column> {
        self.iter().copied().map(Column::from).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl<const N: usize> IntoColumns for [Column; N] {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().collect()
    }
}

/// A selected column must be a plain name (with `.`, `()` or `*`) or a safe
/// function call. Alias expressions must be a bare name or a function call.
fn check_column(column: &Column) -> SqlishResult<()> {
    let ok = match column {
        Column::Name(n) => is_safe_name(n, NameOptions::SELECT) || is_safe_func(n)?,
        Column::Aliased { expr, alias } => {
            (is_safe_name(expr, NameOptions::NONE) || is_safe_func(expr)?)
                && is_safe_name(alias, NameOptions::NONE)
        }
    };
    if ok {
        Ok(())
    } else {
        Err(SqlishError::injection(column.to_string()))
    }
}

/// Text that is itself a safe function call, e.g. `LAST_INSERT_ID()`.
fn as_function_call(value: &Value) -> Option<String> {
    let text = value.as_text()?;
    matches!(is_safe_func(text), Ok(true)).then(|| text.to_string())
}

fn collect_row<I, K, V>(row: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    row.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

fn rendered_sub_statement(name: &str, sub: &Sql) -> SqlishResult<String> {
    if sub.statement().verb.is_none() {
        return Err(SqlishError::injection(format!(
            "{name} requires a built statement, got an empty builder"
        )));
    }
    sub.render(Some(""))
}

impl Sql {
    /// `CREATE TABLE name (definitions)`.
    ///
    /// Also registers `name` in the schema registry if it is not known yet.
    pub fn create_table<I, K>(&mut self, name: &str, columns: I) -> SqlishResult<&mut Self>
    where
        I: IntoIterator<Item = (K, ColumnDef)>,
        K: Into<String>,
    {
        let columns: Vec<(String, ColumnDef)> =
            columns.into_iter().map(|(k, d)| (k.into(), d)).collect();
        if self.delegate_verb(
            VerbMethod::CreateTable,
            &Call::CreateTable {
                name,
                columns: &columns,
            },
        )? {
            return Ok(self);
        }

        let name = require_name(name, NameOptions::NONE)?;
        if columns.is_empty() {
            return Err(SqlishError::malformed(format!(
                "{name} needs at least one column definition"
            )));
        }
        let enc = self.encoder();
        let definitions = columns
            .iter()
            .map(|(column, def)| def.render(column, &enc))
            .collect::<SqlishResult<Vec<_>>>()?;

        self.schemas.ensure_table(&name);
        self.sql = Statement {
            definitions,
            ..Statement::named(Verb::CreateTable, name)
        };
        Ok(self)
    }

    /// `DROP TABLE name`.
    pub fn drop_table(&mut self, name: &str) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::DropTable, &Call::DropTable { name })? {
            return Ok(self);
        }
        let name = require_name(name, NameOptions::NONE)?;
        self.sql = Statement::named(Verb::DropTable, name);
        Ok(self)
    }

    /// `CREATE [UNIQUE] INDEX name ON table (columns)`.
    pub fn create_index(&mut self, name: &str, options: &IndexOptions) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::CreateIndex, &Call::CreateIndex { name, options })? {
            return Ok(self);
        }
        let name = require_name(name, NameOptions::NONE)?;
        let Some(table) = options.table.as_deref().filter(|t| !t.is_empty()) else {
            return Err(SqlishError::malformed("Must define an index on something."));
        };
        if options.columns.is_empty() {
            return Err(SqlishError::malformed("Must define an index on something."));
        }
        let target = require_name(table, NameOptions::NONE)?;
        let columns = require_names(&options.columns, NameOptions::NONE)?;

        self.sql = Statement {
            unique: options.unique,
            target,
            columns: columns.into_iter().map(Column::Name).collect(),
            ..Statement::named(Verb::CreateIndex, name)
        };
        Ok(self)
    }

    /// `DROP INDEX name`.
    pub fn drop_index(&mut self, name: &str) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::DropIndex, &Call::DropIndex { name })? {
            return Ok(self);
        }
        let name = require_name(name, NameOptions::NONE)?;
        self.sql = Statement::named(Verb::DropIndex, name);
        Ok(self)
    }

    /// `CREATE VIEW name AS <view>`. The view is rendered now, without a
    /// terminator.
    pub fn create_view(&mut self, name: &str, view: &Sql) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::CreateView, &Call::CreateView { name, view })? {
            return Ok(self);
        }
        let name = require_name(name, NameOptions::NONE)?;
        let body = rendered_sub_statement(&name, view)?;
        self.sql = Statement {
            view: Some(body),
            ..Statement::named(Verb::CreateView, name)
        };
        Ok(self)
    }

    /// `DROP VIEW name`.
    pub fn drop_view(&mut self, name: &str) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::DropView, &Call::DropView { name })? {
            return Ok(self);
        }
        let name = require_name(name, NameOptions::NONE)?;
        self.sql = Statement::named(Verb::DropView, name);
        Ok(self)
    }

    /// `INSERT INTO table (columns) VALUES (values)`, in row order.
    pub fn insert<I, K, V>(&mut self, table: &str, row: I) -> SqlishResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row = collect_row(row);
        if self.delegate_verb(VerbMethod::Insert, &Call::Insert { table, row: &row })? {
            return Ok(self);
        }
        self.write_row(Verb::Insert, table, row)
    }

    /// Insert a JSON object, keeping its key order.
    pub fn insert_json(&mut self, table: &str, row: &serde_json::Value) -> SqlishResult<&mut Self> {
        self.insert(table, crate::value::row_from_json(row)?)
    }

    /// `REPLACE INTO table (columns) VALUES (values)`.
    pub fn replace<I, K, V>(&mut self, table: &str, row: I) -> SqlishResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row = collect_row(row);
        if self.delegate_verb(VerbMethod::Replace, &Call::Replace { table, row: &row })? {
            return Ok(self);
        }
        if self.dialect.family() == Family::PostgreSql {
            return Err(SqlishError::unsupported(format!(
                "{} does not support replace",
                self.dialect
            )));
        }
        self.write_row(Verb::Replace, table, row)
    }

    fn write_row(&mut self, verb: Verb, table: &str, row: Vec<(String, Value)>) -> SqlishResult<&mut Self> {
        let table = require_name(table, NameOptions::NONE)?;
        if row.is_empty() {
            return Err(SqlishError::malformed(format!(
                "{} {table} needs at least one column",
                verb.keyword()
            )));
        }
        let enc = self.encoder();
        let mut values = Vec::with_capacity(row.len());
        for (column, value) in row {
            let column = require_name(&column, NameOptions::PERIOD)?;
            let value = self.schemas.check(&table, &column, value)?;
            values.push((column, enc.safely(&value)?));
        }

        self.sql = Statement {
            values,
            ..Statement::named(verb, table)
        };
        Ok(self)
    }

    /// `SELECT columns`. An empty column list selects `*`.
    pub fn select(&mut self, columns: impl IntoColumns) -> SqlishResult<&mut Self> {
        self.select_with(columns, SelectOptions::default())
    }

    /// `SELECT [DISTINCT|ALL] columns`.
    pub fn select_with(
        &mut self,
        columns: impl IntoColumns,
        options: SelectOptions,
    ) -> SqlishResult<&mut Self> {
        let columns = columns.into_columns();
        if self.delegate_verb(
            VerbMethod::Select,
            &Call::Select {
                columns: &columns,
                options,
            },
        )? {
            return Ok(self);
        }
        for column in &columns {
            check_column(column)?;
        }
        self.sql = Statement {
            columns,
            ..Statement::new(options.verb())
        };
        Ok(self)
    }

    /// `(left) UNION (right)`. Both sides are rendered now.
    pub fn union(&mut self, left: &Sql, right: &Sql) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::Union, &Call::Union { left, right })? {
            return Ok(self);
        }
        let left = rendered_sub_statement("union", left)?;
        let right = rendered_sub_statement("union", right)?;
        self.sql = Statement {
            union: Some((left, right)),
            ..Statement::new(Verb::Union)
        };
        Ok(self)
    }

    /// `DELETE FROM table`. Add a filter with `where_`.
    pub fn delete_from(&mut self, table: &str) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::DeleteFrom, &Call::DeleteFrom { table })? {
            return Ok(self);
        }
        let table = require_name(table, NameOptions::NONE)?;
        self.sql = Statement::named(Verb::Delete, table);
        Ok(self)
    }

    /// `UPDATE table`. Add assignments with `set`/`set_many`.
    pub fn update(&mut self, table: &str) -> SqlishResult<&mut Self> {
        if self.delegate_verb(VerbMethod::Update, &Call::Update { table })? {
            return Ok(self);
        }
        let table = require_name(table, NameOptions::NONE)?;
        self.sql = Statement::named(Verb::Update, table);
        Ok(self)
    }

    /// Assign one value; see [`set_many`](Self::set_many).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> SqlishResult<&mut Self> {
        self.set_many([(name, value.into())])
    }

    /// Assign values.
    ///
    /// After `update` this appends to the statement's SET list. Otherwise it
    /// starts a standalone `SET` statement; MySQL dialects prefix the names
    /// with `@`, SQLite dialects refuse. Text values that are safe function
    /// calls (`LAST_INSERT_ID()`) are written verbatim.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> SqlishResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs = collect_row(pairs);
        let in_update = self.sql.verb == Some(Verb::Update);
        if in_update {
            if self.delegate_clause(ClauseMethod::Set, &Call::Set { values: &pairs })? {
                return Ok(self);
            }
        } else {
            if self.dialect.family() == Family::Sqlite {
                return Err(SqlishError::unsupported(format!(
                    "{} does not support SET and @varname constructs",
                    self.dialect
                )));
            }
            if self.delegate_verb(VerbMethod::Set, &Call::Set { values: &pairs })? {
                return Ok(self);
            }
        }
        if pairs.is_empty() {
            return Err(SqlishError::malformed("set needs at least one name and value"));
        }

        let prefix = if !in_update && self.dialect.family() == Family::MySql {
            "@"
        } else {
            ""
        };
        let enc = self.encoder();
        let mut values = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            let name = require_name(&name, NameOptions::PERIOD)?;
            let encoded = match as_function_call(&value) {
                Some(call) => call,
                None if in_update => enc.safely(&self.schemas.check(&self.sql.name, &name, value)?)?,
                None => enc.safely(&value)?,
            };
            values.push((format!("{prefix}{name}"), encoded));
        }

        if in_update {
            self.sql.values.extend(values);
        } else {
            self.sql = Statement {
                values,
                ..Statement::new(Verb::Set)
            };
        }
        Ok(self)
    }

    /// Assign the keys of a JSON object, in order.
    pub fn set_json(&mut self, values: &serde_json::Value) -> SqlishResult<&mut Self> {
        self.set_many(crate::value::row_from_json(values)?)
    }
}
