//! Identifier sanitization.
//!
//! [`safe_name`] strips every character outside `[A-Za-z0-9_]` plus the extra
//! characters enabled by [`NameOptions`]. It never fails; callers detect
//! rejected input by comparing the result with the original, which is what
//! [`require_name`] does for every name the builder accepts.
//!
//! # Example
//! ```ignore
//! use sqlish::{NameOptions, safe_name};
//!
//! assert_eq!(safe_name("test.two", NameOptions::NONE), "testtwo");
//! assert_eq!(safe_name("test.two", NameOptions::PERIOD), "test.two");
//! ```

use crate::error::{SqlishError, SqlishResult};

/// Extra characters allowed in a name on top of `[A-Za-z0-9_]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameOptions {
    /// Allow `.` (qualified names such as `table.column`).
    pub period: bool,
    /// Allow `(` and `)`.
    pub parens: bool,
    /// Allow `*`.
    pub asterisk: bool,
    /// Allow `@` (session variables).
    pub at_sign: bool,
    /// Allow `$` (filter operator tags).
    pub dollar_sign: bool,
}

impl NameOptions {
    /// Plain identifiers only.
    pub const NONE: Self = Self {
        period: false,
        parens: false,
        asterisk: false,
        at_sign: false,
        dollar_sign: false,
    };

    /// Qualified identifiers: `table.column`.
    pub const PERIOD: Self = Self {
        period: true,
        ..Self::NONE
    };

    /// Select-list entries: `t.*`, `count()`.
    pub const SELECT: Self = Self {
        period: true,
        parens: true,
        asterisk: true,
        ..Self::NONE
    };

    /// Session variables: `@name`, `@t.name`.
    pub const VARIABLE: Self = Self {
        period: true,
        at_sign: true,
        ..Self::NONE
    };

    /// Filter keys: `table.column` or `$op`.
    pub const FILTER_KEY: Self = Self {
        period: true,
        dollar_sign: true,
        ..Self::NONE
    };

    fn allows(&self, c: char) -> bool {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '_' => true,
            '.' => self.period,
            '(' | ')' => self.parens,
            '*' => self.asterisk,
            '@' => self.at_sign,
            '$' => self.dollar_sign,
            _ => false,
        }
    }
}

/// Return `s` with every disallowed character removed.
pub fn safe_name(s: &str, options: NameOptions) -> String {
    s.chars().filter(|c| options.allows(*c)).collect()
}

/// Returns `true` when `s` is non-empty and survives [`safe_name`] unchanged.
pub fn is_safe_name(s: &str, options: NameOptions) -> bool {
    !s.is_empty() && s.chars().all(|c| options.allows(c))
}

/// Validate a name, failing with an injection error that carries the input.
pub fn require_name(s: &str, options: NameOptions) -> SqlishResult<String> {
    if is_safe_name(s, options) {
        Ok(s.to_string())
    } else {
        Err(SqlishError::injection(s))
    }
}

/// Validate every name in a list.
pub(crate) fn require_names(names: &[String], options: NameOptions) -> SqlishResult<Vec<String>> {
    names.iter().map(|n| require_name(n, options)).collect()
}

/// Returns `true` when `s` is a `table.column` reference: exactly one period
/// with a valid identifier on both sides.
pub fn is_qualified_column(s: &str) -> bool {
    match s.split_once('.') {
        Some((table, column)) => {
            is_safe_name(table, NameOptions::NONE) && is_safe_name(column, NameOptions::NONE)
        }
        None => false,
    }
}

/// Convert an input into a list of names.
///
/// This is mainly for ergonomics in builder APIs: a single name or any list of
/// names is accepted wherever the builder takes tables, fields or targets.
pub trait IntoNames {
    fn into_names(self) -> Vec<String>;
}

impl IntoNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoNames for &String {
    fn into_names(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

impl IntoNames for Vec<&str> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_survive() {
        for name in ["test", "id", "user_id", "T2", "_x"] {
            assert_eq!(safe_name(name, NameOptions::NONE), name);
        }
    }

    #[test]
    fn period_requires_option() {
        assert_eq!(safe_name("test.two", NameOptions::NONE), "testtwo");
        assert_eq!(safe_name("test.two", NameOptions::PERIOD), "test.two");
    }

    #[test]
    fn asterisk_and_period() {
        let opts = NameOptions {
            period: true,
            asterisk: true,
            ..NameOptions::NONE
        };
        assert_eq!(safe_name("test.two.*", opts), "test.two.*");
    }

    #[test]
    fn strips_statement_terminators() {
        let s = "test;DROP TABLE users;";
        assert_ne!(safe_name(s, NameOptions::SELECT), s);
        assert!(require_name(s, NameOptions::SELECT).unwrap_err().is_injection());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(safe_name("", NameOptions::NONE), "");
        assert!(require_name("", NameOptions::NONE).is_err());
    }

    #[test]
    fn non_ascii_letters_are_stripped() {
        assert_eq!(safe_name("naïve", NameOptions::NONE), "nave");
    }

    #[test]
    fn qualified_column_needs_exactly_one_period() {
        assert!(is_qualified_column("test.id"));
        assert!(!is_qualified_column("id"));
        assert!(!is_qualified_column("a.b.c"));
        assert!(!is_qualified_column(".id"));
        assert!(!is_qualified_column("fred@example.com"));
    }

    #[test]
    fn into_names_forms() {
        assert_eq!("a".into_names(), vec!["a"]);
        assert_eq!(["a", "b"].into_names(), vec!["a", "b"]);
        assert_eq!(vec!["a".to_string()].into_names(), vec!["a"]);
    }
}
