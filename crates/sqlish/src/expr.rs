//! Filter expression compiler.

use crate::encode::Encoder;
use crate::error::{SqlishError, SqlishResult};
use crate::filter::{Filter, Operand, Pattern, like_type_error};
use crate::ident::{NameOptions, is_safe_name};
use crate::value::Value;

/// Output of compiling a filter.
///
/// `$eq` with a list compiles to [`Compiled::Values`]; the enclosing field
/// turns it into an OR group. Anywhere else a clause is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// A boolean expression or operator fragment.
    Clause(String),
    /// Encoded literals from `$eq: [...]`.
    Values(Vec<String>),
}

impl Compiled {
    /// The clause text, failing on a bare value list.
    pub fn into_clause(self) -> SqlishResult<String> {
        match self {
            Compiled::Clause(c) => Ok(c),
            Compiled::Values(vs) => Err(SqlishError::malformed(format!(
                "$eq with a list of values needs a column: [{}]",
                vs.join(", ")
            ))),
        }
    }

    /// The clause text, if this is a clause.
    pub fn as_clause(&self) -> Option<&str> {
        match self {
            Compiled::Clause(c) => Some(c),
            Compiled::Values(_) => None,
        }
    }
}

/// Compile a filter with the given encoder.
pub(crate) fn compile(filter: &Filter, enc: &Encoder<'_>) -> SqlishResult<Compiled> {
    match filter {
        Filter::Field(key, operand) => field(key, operand, enc).map(Compiled::Clause),
        Filter::Eq(Operand::Value(v)) => Ok(Compiled::Clause(format!("= {}", enc.safely(v)?))),
        Filter::Eq(Operand::List(vs)) => Ok(Compiled::Values(
            vs.iter().map(|v| enc.safely(v)).collect::<SqlishResult<_>>()?,
        )),
        Filter::Eq(Operand::Filter(f)) => Err(SqlishError::injection(format!(
            "$eq takes a value or a list of values, not {f:?}"
        ))),
        Filter::Cmp(op, Operand::Value(v)) => {
            Ok(Compiled::Clause(format!("{} {}", op.symbol(), enc.safely(v)?)))
        }
        Filter::Cmp(op, Operand::Filter(f)) => Ok(Compiled::Clause(format!(
            "{} {}",
            op.symbol(),
            compile(f, enc)?.into_clause()?
        ))),
        Filter::Cmp(op, Operand::List(vs)) => Err(SqlishError::injection(format!(
            "{} takes a single value, not {vs:?}",
            op.tag()
        ))),
        Filter::And(fs) => join(fs, "$and", " AND ", enc).map(Compiled::Clause),
        Filter::Or(fs) => join(fs, "$or", " OR ", enc).map(Compiled::Clause),
        Filter::Like(pattern) => like(pattern, enc).map(Compiled::Clause),
    }
}

fn field(key: &str, operand: &Operand, enc: &Encoder<'_>) -> SqlishResult<String> {
    if key.starts_with('$') || !is_safe_name(key, NameOptions::FILTER_KEY) {
        return Err(SqlishError::injection(format!("{key} should be an object literal")));
    }
    match operand {
        Operand::Value(v) => Ok(format!("{key} = {}", enc.safely(v)?)),
        Operand::Filter(f) => match compile(f, enc)? {
            Compiled::Values(vs) => Ok(format!(
                "({})",
                vs.iter()
                    .map(|v| format!("{key} = {v}"))
                    .collect::<Vec<_>>()
                    .join(" OR ")
            )),
            Compiled::Clause(c) => Ok(format!("{key} {c}")),
        },
        Operand::List(vs) => Err(SqlishError::malformed(format!(
            "{key} takes a value or an object literal, not {vs:?}"
        ))),
    }
}

fn join(filters: &[Filter], tag: &str, sep: &str, enc: &Encoder<'_>) -> SqlishResult<String> {
    if filters.is_empty() {
        return Err(SqlishError::malformed(format!(
            "{tag} takes an array of objects as the value"
        )));
    }
    let parts = filters
        .iter()
        .map(|f| compile(f, enc)?.into_clause())
        .collect::<SqlishResult<Vec<_>>>()?;
    Ok(parts.join(sep))
}

fn like(pattern: &Pattern, enc: &Encoder<'_>) -> SqlishResult<String> {
    let encoded = match pattern {
        Pattern::Regex(re) => enc.safely(&Value::Text(re_to_sql_wildcard(re)))?,
        Pattern::Value(v @ (Value::Text(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_))) => {
            enc.safely(v)?
        }
        Pattern::Value(_) => return Err(like_type_error()),
    };
    Ok(format!("LIKE {encoded}"))
}

/// Compile a filter with the standard dialect rules.
///
/// Use [`Sql::expr`](crate::Sql::expr) to honor a builder's dialect and
/// schema registry.
pub fn expr(filter: &Filter) -> SqlishResult<Compiled> {
    compile(filter, &Encoder::default())
}

/// Compile a filter and wrap it in parentheses.
pub fn p(filter: &Filter) -> SqlishResult<String> {
    Ok(format!("({})", expr(filter)?.into_clause()?))
}

/// Translate a narrow regular expression into a LIKE pattern.
///
/// `*` becomes `%`. Anchors decide where wildcards go: `^a` is `a%`, `a$` is
/// `%a`, `^a$` is `a` and an unanchored `a` is `%a%`. Anything else is
/// returned with only the `*` substitution applied.
pub fn re_to_sql_wildcard(re: &str) -> String {
    let s = re.replace('*', "%");
    let starts = s.starts_with('^');
    // Only the first `$` counts as an anchor.
    let ends = !s.is_empty() && s.find('$') == Some(s.len() - 1);
    match (starts, ends) {
        (true, true) => s[1..s.len() - 1].to_string(),
        (true, false) => format!("{}%", s[1..].trim_end()),
        (false, true) => format!("%{}", s[..s.len() - 1].trim_start()),
        (false, false) if !s.contains(['^', '$']) => format!("%{s}%"),
        (false, false) => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Family;

    fn clause(f: Filter) -> String {
        expr(&f).unwrap().into_clause().unwrap()
    }

    #[test]
    fn fields_and_equality() {
        assert_eq!(clause(Filter::field("name", "George")), r#"name = "George""#);
        assert_eq!(clause(Filter::nested("name", Filter::eq("George"))), r#"name = "George""#);
        assert_eq!(clause(Filter::field("cnt", 3)), "cnt = 3");
        assert_eq!(clause(Filter::nested("cnt", Filter::eq(3))), "cnt = 3");
    }

    #[test]
    fn comparisons() {
        assert_eq!(clause(Filter::nested("cnt", Filter::gt(3))), "cnt > 3");
        assert_eq!(clause(Filter::nested("cnt", Filter::gte(3))), "cnt >= 3");
        assert_eq!(clause(Filter::nested("cnt", Filter::lt(3))), "cnt < 3");
        assert_eq!(clause(Filter::nested("cnt", Filter::lte(3))), "cnt <= 3");
        assert_eq!(clause(Filter::nested("cnt", Filter::ne(3))), "cnt != 3");
    }

    #[test]
    fn boolean_groups() {
        let names = |n: &[&str]| n.iter().map(|n| Filter::field("name", *n)).collect::<Vec<_>>();
        assert_eq!(
            clause(Filter::or(names(&["George", "Georgia"]))),
            r#"name = "George" OR name = "Georgia""#
        );
        assert_eq!(
            clause(Filter::or(names(&["George", "Georgia", "Wilma"]))),
            r#"name = "George" OR name = "Georgia" OR name = "Wilma""#
        );
        assert_eq!(
            clause(Filter::and(names(&["George", "Georgia", "Wilma"]))),
            r#"name = "George" AND name = "Georgia" AND name = "Wilma""#
        );
        assert_eq!(
            clause(Filter::or(vec![
                Filter::field("a", 1),
                Filter::field("a", 2),
                Filter::field("a", 3)
            ])),
            "a = 1 OR a = 2 OR a = 3"
        );
    }

    #[test]
    fn empty_groups_are_malformed() {
        let err = expr(&Filter::and(vec![])).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.to_string(), "$and takes an array of objects as the value");
    }

    #[test]
    fn eq_list_is_raw_values_until_wrapped() {
        assert_eq!(
            expr(&Filter::eq_any([1, 2, 3])).unwrap(),
            Compiled::Values(vec!["1".into(), "2".into(), "3".into()])
        );
        assert_eq!(
            clause(Filter::nested("id", Filter::eq_any([1, 2, 3]))),
            "(id = 1 OR id = 2 OR id = 3)"
        );
        let nested = Filter::and(vec![Filter::eq_any([1, 2])]);
        assert!(expr(&nested).unwrap_err().is_malformed());
    }

    #[test]
    fn parenthesized() {
        assert_eq!(p(&Filter::field("cnt", 3)).unwrap(), "(cnt = 3)");
        assert_eq!(
            p(&Filter::nested("name", Filter::like("John"))).unwrap(),
            r#"(name LIKE "John")"#
        );
        assert_eq!(p(&Filter::nested("name", Filter::like(5))).unwrap(), "(name LIKE 5)");
    }

    #[test]
    fn like_rejects_non_text() {
        let err = expr(&Filter::nested("name", Filter::like(Value::Null))).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn like_regex() {
        let like = |re: &str| clause(Filter::nested("name", Filter::like_regex(re)));
        assert_eq!(like("Albert"), r#"name LIKE "%Albert%""#);
        assert_eq!(like("^Albert"), r#"name LIKE "Albert%""#);
        assert_eq!(like("Albert$"), r#"name LIKE "%Albert""#);
        assert_eq!(like("^Albert$"), r#"name LIKE "Albert""#);
        assert_eq!(like("^Albert*Carrots"), r#"name LIKE "Albert%Carrots%""#);
        assert_eq!(like("^Albert*Carrots*bricks$"), r#"name LIKE "Albert%Carrots%bricks""#);
    }

    #[test]
    fn wildcard_translation() {
        assert_eq!(re_to_sql_wildcard("^Albert*Carrots$"), "Albert%Carrots");
        assert_eq!(re_to_sql_wildcard("a^b"), "a^b");
        assert_eq!(re_to_sql_wildcard("^"), "%");
    }

    #[test]
    fn field_keys_are_sanitized() {
        let err = expr(&Filter::field("id; DROP", 1)).unwrap_err();
        assert!(err.is_injection());
        assert!(err.to_string().contains("id; DROP"));
        assert!(expr(&Filter::field("$eq", 1)).unwrap_err().is_injection());
        assert_eq!(clause(Filter::field("test.id", 2)), "test.id = 2");
    }

    #[test]
    fn column_operands_stay_unquoted() {
        let f = Filter::column_eq("a.id", "b.a_id").unwrap();
        assert_eq!(clause(f), "a.id = b.a_id");
    }

    #[test]
    fn scalar_round_trip() {
        let enc = Encoder::default();
        for v in [Value::Int(7), Value::Text("x y".into()), Value::Bool(false), Value::Null] {
            let expected = format!("col = {}", enc.safely(&v).unwrap());
            assert_eq!(clause(Filter::Field("col".into(), Operand::Value(v))), expected);
        }
    }

    #[test]
    fn encoder_family_applies() {
        let enc = Encoder::new(Family::Sqlite);
        let out = compile(&Filter::field("name", "O'Brien"), &enc).unwrap();
        assert_eq!(out.as_clause(), Some(r#"name = "O''Brien""#));
    }
}
