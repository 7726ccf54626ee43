//! Trait definitions for statement builders.

use crate::dialect::Dialect;
use crate::error::{SqlishError, SqlishResult};

/// Base trait for anything that renders to SQL text.
pub trait SqlStatement {
    /// The dialect the statement is rendered for.
    fn dialect(&self) -> &Dialect;

    /// Render the statement.
    ///
    /// `eol` overrides the configured terminator; `Some("")` suppresses it.
    fn render(&self, eol: Option<&str>) -> SqlishResult<String>;

    /// Render with the configured terminator.
    fn to_sql(&self) -> SqlishResult<String> {
        self.render(None)
    }

    /// Statements are never executed by this library.
    fn execute(&self) -> SqlishResult<()> {
        Err(SqlishError::NotImplemented(format!(
            "execute not supported by {}",
            self.dialect()
        )))
    }
}
