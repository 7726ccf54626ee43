//! Clause methods. These fill slots of the current statement and never
//! change its verb.

use super::Sql;
use super::statement::{Direction, Join, Order};
use crate::dialect::{Call, ClauseMethod, Family};
use crate::error::{SqlishError, SqlishResult};
use crate::filter::Filter;
use crate::ident::{IntoNames, NameOptions, require_names};

fn non_empty(clause: ClauseMethod, names: Vec<String>) -> SqlishResult<Vec<String>> {
    if names.is_empty() {
        return Err(SqlishError::malformed(format!(
            "{} needs at least one name",
            clause.name()
        )));
    }
    Ok(names)
}

impl Sql {
    /// `FROM tables`.
    pub fn from(&mut self, tables: impl IntoNames) -> SqlishResult<&mut Self> {
        let tables = tables.into_names();
        if self.delegate_clause(ClauseMethod::From, &Call::From { tables: &tables })? {
            return Ok(self);
        }
        let tables = require_names(&non_empty(ClauseMethod::From, tables)?, NameOptions::NONE)?;
        self.sql.from = tables;
        Ok(self)
    }

    /// `JOIN tables ON (filter)`.
    pub fn join(&mut self, tables: impl IntoNames, on: &Filter) -> SqlishResult<&mut Self> {
        let tables = tables.into_names();
        if self.delegate_clause(ClauseMethod::Join, &Call::Join { tables: &tables, on })? {
            return Ok(self);
        }
        let tables = require_names(&non_empty(ClauseMethod::Join, tables)?, NameOptions::NONE)?;
        let on = self.expr(on)?.into_clause()?;
        self.sql.join = Some(Join { tables, on });
        Ok(self)
    }

    /// `WHERE filter`.
    pub fn where_(&mut self, filter: &Filter) -> SqlishResult<&mut Self> {
        if self.delegate_clause(ClauseMethod::Where, &Call::Where { filter })? {
            return Ok(self);
        }
        let clause = self.expr(filter)?.into_clause()?;
        self.sql.where_ = Some(clause);
        Ok(self)
    }

    /// `WHERE filter`, parsing the filter from JSON.
    pub fn where_json(&mut self, filter: &serde_json::Value) -> SqlishResult<&mut Self> {
        self.where_(&Filter::from_json(filter)?)
    }

    /// Paging.
    ///
    /// With no `count`, `index` is the row limit. With a `count`, `count`
    /// rows are returned starting after `index`: `LIMIT count OFFSET index`.
    pub fn limit(&mut self, index: u64, count: Option<u64>) -> SqlishResult<&mut Self> {
        if self.delegate_clause(ClauseMethod::Limit, &Call::Limit { index, count })? {
            return Ok(self);
        }
        match count {
            None => self.sql.limit = Some(index),
            Some(count) => {
                self.sql.limit = Some(count);
                self.sql.offset = Some(index);
            }
        }
        Ok(self)
    }

    /// `OFFSET index`.
    pub fn offset(&mut self, index: u64) -> SqlishResult<&mut Self> {
        if self.delegate_clause(ClauseMethod::Offset, &Call::Offset { index })? {
            return Ok(self);
        }
        self.sql.offset = Some(index);
        Ok(self)
    }

    /// `ORDER BY fields [ASC|DESC]`.
    pub fn order(
        &mut self,
        fields: impl IntoNames,
        direction: Option<Direction>,
    ) -> SqlishResult<&mut Self> {
        let fields = fields.into_names();
        if self.delegate_clause(
            ClauseMethod::Order,
            &Call::Order {
                fields: &fields,
                direction,
            },
        )? {
            return Ok(self);
        }
        let fields = require_names(&non_empty(ClauseMethod::Order, fields)?, NameOptions::PERIOD)?;
        self.sql.order = Some(Order { fields, direction });
        Ok(self)
    }

    /// Alias for [`order`](Self::order).
    pub fn order_by(
        &mut self,
        fields: impl IntoNames,
        direction: Option<Direction>,
    ) -> SqlishResult<&mut Self> {
        self.order(fields, direction)
    }

    /// `GROUP BY fields`.
    pub fn group(&mut self, fields: impl IntoNames) -> SqlishResult<&mut Self> {
        let fields = fields.into_names();
        if self.delegate_clause(ClauseMethod::Group, &Call::Group { fields: &fields })? {
            return Ok(self);
        }
        let fields = require_names(&non_empty(ClauseMethod::Group, fields)?, NameOptions::PERIOD)?;
        self.sql.group = fields;
        Ok(self)
    }

    /// Alias for [`group`](Self::group).
    pub fn group_by(&mut self, fields: impl IntoNames) -> SqlishResult<&mut Self> {
        self.group(fields)
    }

    /// `INTO targets`, usually `@variables`. Refused by SQLite dialects.
    pub fn into_(&mut self, targets: impl IntoNames) -> SqlishResult<&mut Self> {
        let targets = targets.into_names();
        if self.delegate_clause(ClauseMethod::Into, &Call::Into { targets: &targets })? {
            return Ok(self);
        }
        if self.dialect.family() == Family::Sqlite {
            return Err(SqlishError::unsupported(format!(
                "INTO not supported by {}",
                self.dialect
            )));
        }
        let targets = require_names(&non_empty(ClauseMethod::Into, targets)?, NameOptions::VARIABLE)?;
        self.sql.into = targets;
        Ok(self)
    }
}
