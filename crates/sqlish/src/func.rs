//! Whitelisted SQL function-call syntax.
//!
//! [`safe_func`] lets call expressions such as `COUNT()`, `LAST_INSERT_ID()`
//! or `CONCAT("a", name)` through the builder while refusing anything that
//! could terminate the statement.

use crate::error::{SqlishError, SqlishResult};
use regex::Regex;
use std::sync::OnceLock;

fn bare_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[A-Z_]+\(\)$").expect("invalid built-in call regex"))
}

fn call_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[A-Z_]+\(").expect("invalid built-in call regex"))
}

fn is_argument_char(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_alphanumeric() || c == ',' || c == '.'
}

/// Validate a function call.
///
/// Returns:
/// - `Ok(Some(call))` with the accepted call text. Anything after the closing
///   parenthesis is dropped, so `CONCAT("a");DROP x` yields `CONCAT("a")`.
/// - `Ok(None)` when `s` is not a complete call or contains an unquoted `;`.
/// - `Err(Injection)` when an unquoted argument character is not whitespace,
///   a letter, a digit, `,` or `.`.
pub fn safe_func(s: &str) -> SqlishResult<Option<String>> {
    if bare_call_re().is_match(s) {
        return Ok(Some(s.to_string()));
    }
    let Some(open) = call_open_re().find(s) else {
        return Ok(None);
    };

    let mut quote: Option<char> = None;
    let mut depth = 1usize;
    let mut chars = s[open.end()..].char_indices().map(|(i, c)| (i + open.end(), c));

    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    // Escaped character inside a quoted argument.
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                ';' => return Ok(None),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some(s[..=i].to_string()));
                    }
                }
                c if is_argument_char(c) => {}
                c => {
                    return Err(SqlishError::injection(format!("at '{c}' in {s}")));
                }
            },
        }
    }
    Ok(None)
}

/// Returns `true` when `s` is accepted by [`safe_func`] unchanged.
pub(crate) fn is_safe_func(s: &str) -> SqlishResult<bool> {
    Ok(safe_func(s)?.as_deref() == Some(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_calls_pass() {
        assert_eq!(safe_func("LAST_INSERT_ID()").unwrap().as_deref(), Some("LAST_INSERT_ID()"));
        assert_eq!(safe_func("count()").unwrap().as_deref(), Some("count()"));
    }

    #[test]
    fn quoted_arguments_pass() {
        let s = r#"CONCAT("Hello", "World!")"#;
        assert_eq!(safe_func(s).unwrap().as_deref(), Some(s));
    }

    #[test]
    fn escaped_quotes_inside_arguments() {
        let s = r#"CONCAT("said", name, ", \"World I know!\"")"#;
        assert_eq!(safe_func(s).unwrap().as_deref(), Some(s));
    }

    #[test]
    fn nested_calls() {
        let s = r#"CONCAT("Hello World!", COUNT())"#;
        assert_eq!(safe_func(s).unwrap().as_deref(), Some(s));
    }

    #[test]
    fn trailing_statement_is_truncated() {
        let s = r#"CONCAT("Hello");SELECT "World!";"#;
        assert_eq!(safe_func(s).unwrap().as_deref(), Some(r#"CONCAT("Hello")"#));
    }

    #[test]
    fn unquoted_semicolon_fails() {
        assert_eq!(safe_func(r#"CONCAT("Hello World!";"#).unwrap(), None);
    }

    #[test]
    fn unterminated_quote_fails() {
        assert_eq!(safe_func(r#"CONCAT("Hello World!');"#).unwrap(), None);
    }

    #[test]
    fn not_a_call() {
        assert_eq!(safe_func("name").unwrap(), None);
        assert_eq!(safe_func("test;DROP TABLE users;").unwrap(), None);
    }

    #[test]
    fn unexpected_argument_character_is_injection() {
        let err = safe_func("SUM(a+b)").unwrap_err();
        assert!(err.is_injection());
        assert!(err.to_string().contains("SUM(a+b)"));
    }
}
