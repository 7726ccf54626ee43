//! The in-progress statement.

use std::fmt;

/// Statement verb. Determines the rendered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    CreateTable,
    DropTable,
    CreateIndex,
    DropIndex,
    CreateView,
    DropView,
    Insert,
    Replace,
    Update,
    Delete,
    Select,
    SelectDistinct,
    SelectAll,
    Set,
    Union,
}

impl Verb {
    /// Leading SQL keywords.
    pub fn keyword(&self) -> &'static str {
        match self {
            Verb::CreateTable => "CREATE TABLE",
            Verb::DropTable => "DROP TABLE",
            Verb::CreateIndex => "CREATE INDEX",
            Verb::DropIndex => "DROP INDEX",
            Verb::CreateView => "CREATE VIEW",
            Verb::DropView => "DROP VIEW",
            Verb::Insert => "INSERT INTO",
            Verb::Replace => "REPLACE INTO",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE FROM",
            Verb::Select => "SELECT",
            Verb::SelectDistinct => "SELECT DISTINCT",
            Verb::SelectAll => "SELECT ALL",
            Verb::Set => "SET",
            Verb::Union => "UNION",
        }
    }

    /// `SELECT`, `SELECT DISTINCT` or `SELECT ALL`.
    pub fn is_select(&self) -> bool {
        matches!(self, Verb::Select | Verb::SelectDistinct | Verb::SelectAll)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A selected column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// A name, `*`, `t.*` or function call.
    Name(String),
    /// `expr AS alias`
    Aliased { expr: String, alias: String },
}

impl Column {
    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        Column::Aliased {
            expr: expr.into(),
            alias: alias.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name(n) => f.write_str(n),
            Column::Aliased { expr, alias } => write!(f, "{expr} AS {alias}"),
        }
    }
}

impl From<&str> for Column {
    fn from(s: &str) -> Self {
        Column::Name(s.to_string())
    }
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        Column::Name(s)
    }
}

impl From<(&str, &str)> for Column {
    fn from((expr, alias): (&str, &str)) -> Self {
        Column::aliased(expr, alias)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Numeric convention: negative sorts descending, anything else ascending.
    pub fn from_sign(n: i64) -> Self {
        if n < 0 { Direction::Desc } else { Direction::Asc }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// `JOIN tables ON (on)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub tables: Vec<String>,
    /// Compiled ON expression.
    pub on: String,
}

/// `ORDER BY fields [direction]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub fields: Vec<String>,
    pub direction: Option<Direction>,
}

/// One SQL command under construction.
///
/// Every field holds validated, encoded SQL text. A verb method replaces the
/// whole statement; clause methods fill in slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub verb: Option<Verb>,
    /// `CREATE UNIQUE INDEX`
    pub unique: bool,
    /// Table, index or view name.
    pub name: String,
    /// Table an index is created on.
    pub target: String,
    /// Selected columns, or indexed columns.
    pub columns: Vec<Column>,
    /// Rendered column definitions for CREATE TABLE.
    pub definitions: Vec<String>,
    /// `(column, encoded value)` pairs for INSERT, REPLACE and SET.
    pub values: Vec<(String, String)>,
    /// Rendered view body for CREATE VIEW.
    pub view: Option<String>,
    /// Rendered operands for UNION.
    pub union: Option<(String, String)>,
    pub from: Vec<String>,
    pub join: Option<Join>,
    pub where_: Option<String>,
    pub group: Vec<String>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub into: Vec<String>,
}

impl Statement {
    /// A fresh statement for a verb.
    pub fn new(verb: Verb) -> Self {
        Self {
            verb: Some(verb),
            ..Self::default()
        }
    }

    /// A fresh statement for a verb, naming its table, index or view.
    pub fn named(verb: Verb, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(verb)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_keywords() {
        assert_eq!(Verb::Delete.keyword(), "DELETE FROM");
        assert_eq!(Verb::SelectDistinct.to_string(), "SELECT DISTINCT");
        assert!(Verb::SelectAll.is_select());
        assert!(!Verb::Union.is_select());
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::from_sign(0), Direction::Asc);
        assert_eq!(Direction::from_sign(7), Direction::Asc);
        assert_eq!(Direction::from_sign(-1), Direction::Desc);
    }

    #[test]
    fn column_display() {
        assert_eq!(Column::from("id").to_string(), "id");
        assert_eq!(Column::from(("count(*)", "n")).to_string(), "count(*) AS n");
    }

    #[test]
    fn named_statement_is_otherwise_empty() {
        let s = Statement::named(Verb::DropTable, "t");
        assert_eq!(s.verb, Some(Verb::DropTable));
        assert_eq!(s.name, "t");
        assert!(s.values.is_empty() && s.where_.is_none());
    }
}
