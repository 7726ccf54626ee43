//! Mongo-style filter expressions.
//!
//! A [`Filter`] is the typed form of `{key: value}` trees such as
//! `{"$or": [{"a": 1}, {"a": {"$gt": 2}}]}`. Build one with the constructors
//! or parse it once from JSON with [`Filter::from_json`]; the expression
//! compiler then walks the typed tree.
//!
//! # Example
//! ```ignore
//! use sqlish::Filter;
//!
//! let f = Filter::or(vec![
//!     Filter::field("name", "George"),
//!     Filter::nested("cnt", Filter::gt(3)),
//! ]);
//! let same = Filter::from_json(&serde_json::json!({
//!     "$or": [{"name": "George"}, {"cnt": {"$gt": 3}}]
//! }))?;
//! ```

use crate::error::{SqlishError, SqlishResult};
use crate::ident::{NameOptions, is_safe_name};
use crate::value::Value;

/// Comparison operators taking a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `$ne`
    Ne,
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
}

impl CmpOp {
    /// SQL operator symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }

    /// Filter tag, e.g. `$gte`.
    pub fn tag(&self) -> &'static str {
        match self {
            CmpOp::Ne => "$ne",
            CmpOp::Gt => "$gt",
            CmpOp::Gte => "$gte",
            CmpOp::Lt => "$lt",
            CmpOp::Lte => "$lte",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "$ne" => Some(CmpOp::Ne),
            "$gt" => Some(CmpOp::Gt),
            "$gte" => Some(CmpOp::Gte),
            "$lt" => Some(CmpOp::Lt),
            "$lte" => Some(CmpOp::Lte),
            _ => None,
        }
    }
}

/// Right-hand side of a field or operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal.
    Value(Value),
    /// A list of literals (only meaningful for `$eq`).
    List(Vec<Value>),
    /// A nested filter.
    Filter(Box<Filter>),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Filter> for Operand {
    fn from(f: Filter) -> Self {
        Operand::Filter(Box::new(f))
    }
}

impl From<Vec<Value>> for Operand {
    fn from(v: Vec<Value>) -> Self {
        Operand::List(v)
    }
}

/// `$like` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A literal LIKE pattern (text or number).
    Value(Value),
    /// A narrow regular expression translated to LIKE wildcards.
    Regex(String),
}

/// A filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `{column: operand}`
    Field(String, Operand),
    /// `{$eq: operand}`
    Eq(Operand),
    /// `{$ne|$gt|$gte|$lt|$lte: operand}`
    Cmp(CmpOp, Operand),
    /// `{$and: [...]}`
    And(Vec<Filter>),
    /// `{$or: [...]}`
    Or(Vec<Filter>),
    /// `{$like: pattern}`
    Like(Pattern),
}

impl Filter {
    /// `{column: value}`, rendered as `column = value`.
    pub fn field(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Field(column.into(), Operand::Value(value.into()))
    }

    /// `{column: {...}}`, e.g. `Filter::nested("cnt", Filter::gt(3))`.
    pub fn nested(column: impl Into<String>, filter: Filter) -> Self {
        Filter::Field(column.into(), filter.into())
    }

    /// `{column: "table.column"}` as a column comparison.
    pub fn column_eq(column: impl Into<String>, reference: &str) -> SqlishResult<Self> {
        Ok(Filter::Field(column.into(), Value::column(reference)?.into()))
    }

    /// `{$eq: value}`
    pub fn eq(value: impl Into<Value>) -> Self {
        Filter::Eq(Operand::Value(value.into()))
    }

    /// `{$eq: [v1, v2, ...]}`; under a column this becomes `(c = v1 OR c = v2 ...)`.
    pub fn eq_any<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::Eq(Operand::List(values.into_iter().map(Into::into).collect()))
    }

    /// `{$ne: value}`
    pub fn ne(value: impl Into<Value>) -> Self {
        Filter::Cmp(CmpOp::Ne, Operand::Value(value.into()))
    }

    /// `{$gt: value}`
    pub fn gt(value: impl Into<Value>) -> Self {
        Filter::Cmp(CmpOp::Gt, Operand::Value(value.into()))
    }

    /// `{$gte: value}`
    pub fn gte(value: impl Into<Value>) -> Self {
        Filter::Cmp(CmpOp::Gte, Operand::Value(value.into()))
    }

    /// `{$lt: value}`
    pub fn lt(value: impl Into<Value>) -> Self {
        Filter::Cmp(CmpOp::Lt, Operand::Value(value.into()))
    }

    /// `{$lte: value}`
    pub fn lte(value: impl Into<Value>) -> Self {
        Filter::Cmp(CmpOp::Lte, Operand::Value(value.into()))
    }

    /// `{$and: [...]}`
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// `{$or: [...]}`
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    /// `{$like: "pattern"}`
    pub fn like(pattern: impl Into<Value>) -> Self {
        Filter::Like(Pattern::Value(pattern.into()))
    }

    /// `{$like: /regex/}`, see [`re_to_sql_wildcard`](crate::re_to_sql_wildcard).
    pub fn like_regex(regex: impl Into<String>) -> Self {
        Filter::Like(Pattern::Regex(regex.into()))
    }

    /// Parse a JSON filter.
    ///
    /// Every object must have exactly one key. `$like` takes a string or
    /// number, or `{"$regex": "..."}` for a pattern.
    pub fn from_json(json: &serde_json::Value) -> SqlishResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(not_an_object_literal(json));
        };
        let mut entries = map.iter();
        let (Some((key, value)), None) = (entries.next(), entries.next()) else {
            return Err(not_an_object_literal(json));
        };
        if !is_safe_name(key, NameOptions::FILTER_KEY) {
            return Err(not_an_object_literal(json));
        }

        if !key.starts_with('$') {
            return Ok(Filter::Field(key.clone(), operand_from_json(value)?));
        }

        match key.as_str() {
            "$eq" => Ok(Filter::Eq(operand_from_json(value)?)),
            "$and" => Ok(Filter::And(list_from_json(key, value)?)),
            "$or" => Ok(Filter::Or(list_from_json(key, value)?)),
            "$like" => Ok(Filter::Like(pattern_from_json(value)?)),
            tag => match CmpOp::from_tag(tag) {
                Some(op) => Ok(Filter::Cmp(op, operand_from_json(value)?)),
                None => Err(SqlishError::malformed(format!("{tag} not supported"))),
            },
        }
    }
}

fn not_an_object_literal(json: &serde_json::Value) -> SqlishError {
    SqlishError::injection(format!("{json} should be an object literal"))
}

fn operand_from_json(json: &serde_json::Value) -> SqlishResult<Operand> {
    match json {
        serde_json::Value::Object(_) => Ok(Filter::from_json(json)?.into()),
        serde_json::Value::Array(items) => Ok(Operand::List(
            items.iter().map(Value::from_json).collect::<SqlishResult<_>>()?,
        )),
        scalar => Ok(Operand::Value(Value::from_json(scalar)?)),
    }
}

fn list_from_json(tag: &str, json: &serde_json::Value) -> SqlishResult<Vec<Filter>> {
    let serde_json::Value::Array(items) = json else {
        return Err(SqlishError::malformed(format!(
            "{tag} takes an array of objects as the value"
        )));
    };
    items.iter().map(Filter::from_json).collect()
}

fn pattern_from_json(json: &serde_json::Value) -> SqlishResult<Pattern> {
    match json {
        serde_json::Value::String(_) | serde_json::Value::Number(_) | serde_json::Value::Bool(_) => {
            Ok(Pattern::Value(Value::from_json(json)?))
        }
        serde_json::Value::Object(map) if map.len() == 1 => match map.get("$regex") {
            Some(serde_json::Value::String(re)) => Ok(Pattern::Regex(re.clone())),
            _ => Err(like_type_error()),
        },
        _ => Err(like_type_error()),
    }
}

pub(crate) fn like_type_error() -> SqlishError {
    SqlishError::malformed("$like takes a value that is of type string or number")
}
