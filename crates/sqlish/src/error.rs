//! Error types for sqlish

use thiserror::Error;

/// Result type alias for sqlish operations
pub type SqlishResult<T> = Result<T, SqlishError>;

/// Error types for statement building.
///
/// Every builder call fails fast: no partially built statement is ever
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlishError {
    /// A name, value, filter or sub-statement failed sanitization.
    ///
    /// The message always contains the offending input.
    #[error("injection error: {0}")]
    Injection(String),

    /// The verb or clause is disabled for the active dialect.
    #[error("{0}")]
    Unsupported(String),

    /// Missing options, unknown column types or operator tags, or a statement
    /// that cannot be assembled.
    #[error("{0}")]
    Malformed(String),

    /// Operations this library deliberately never performs.
    #[error("{0}")]
    NotImplemented(String),

    /// Configuration could not be parsed or resolved.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlishError {
    /// Create an injection error.
    pub fn injection(message: impl Into<String>) -> Self {
        let message = message.into();
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "sqlish.injection", input = %message, "rejected input");
        Self::Injection(message)
    }

    /// Create an unsupported-feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        let message = message.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sqlish.dialect", reason = %message, "feature refused");
        Self::Unsupported(message)
    }

    /// Create a malformed-input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an injection error
    pub fn is_injection(&self) -> bool {
        matches!(self, Self::Injection(_))
    }

    /// Check if this is an unsupported-feature error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Check if this is a malformed-input error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Check if this is a not-implemented error
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

impl From<toml::de::Error> for SqlishError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
