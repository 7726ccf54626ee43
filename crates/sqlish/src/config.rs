//! Builder configuration loaded from TOML.
//!
//! ```toml
//! dialect = "ReadOnlyLite"
//! eol = ";"
//! use_utc = true
//!
//! [[dialects]]
//! name = "ReadOnlyLite"
//! description = "SQLite 3 (read only)"
//! based_on = "SQLite3"
//!
//! [dialects.verbs]
//! insert = false
//! update = false
//! deleteFrom = false
//! ```

use crate::dialect::{ClauseMethod, Dialect, DialectRegistry, Family, VerbMethod};
use crate::error::{SqlishError, SqlishResult};
use crate::sql::{DEFAULT_EOL, Sql};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::de::IntoDeserializer;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Registry name of the dialect to build for.
    #[serde(default = "default_dialect")]
    pub dialect: String,
    #[serde(default = "default_eol")]
    pub eol: String,
    #[serde(default)]
    pub use_utc: bool,
    /// Extra dialects, registered in order.
    #[serde(default)]
    pub dialects: Vec<DialectDef>,
}

fn default_dialect() -> String {
    "SQL92".to_string()
}

fn default_eol() -> String {
    DEFAULT_EOL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            eol: default_eol(),
            use_utc: false,
            dialects: Vec::new(),
        }
    }
}

/// A dialect defined in configuration.
///
/// `verbs` and `clauses` map method names (`createTable`, `deleteFrom`,
/// `where`, ...) to whether they are supported.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialectDef {
    pub name: String,
    pub description: Option<String>,
    pub family: Option<Family>,
    /// Registry name of a dialect to inherit from.
    pub based_on: Option<String>,
    #[serde(default)]
    pub verbs: BTreeMap<String, bool>,
    #[serde(default)]
    pub clauses: BTreeMap<String, bool>,
}

fn parse_method<T: DeserializeOwned>(kind: &str, name: &str) -> SqlishResult<T> {
    let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        name.into_deserializer();
    T::deserialize(de).map_err(|_| SqlishError::config(format!("unknown {kind} method: {name}")))
}

impl DialectDef {
    /// Build the dialect, resolving `based_on` against `registry`.
    pub fn build(&self, registry: &DialectRegistry) -> SqlishResult<Dialect> {
        let mut builder = Dialect::builder(&self.name);
        if let Some(base) = &self.based_on {
            let base = registry.get(base).ok_or_else(|| {
                SqlishError::config(format!("{}: unknown base dialect {base}", self.name))
            })?;
            builder = builder.based_on(&base);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(family) = self.family {
            builder = builder.family(family);
        }
        for (name, supported) in &self.verbs {
            builder = builder.verb(parse_method::<VerbMethod>("verb", name)?, *supported);
        }
        for (name, supported) in &self.clauses {
            builder = builder.clause(parse_method::<ClauseMethod>("clause", name)?, *supported);
        }
        Ok(builder.build())
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> SqlishResult<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SqlishResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SqlishError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> SqlishResult<()> {
        if self.dialect.trim().is_empty() {
            return Err(SqlishError::config("dialect must not be empty"));
        }
        let mut seen = std::collections::HashSet::<&str>::new();
        for d in &self.dialects {
            if d.name.trim().is_empty() {
                return Err(SqlishError::config("dialects.name must not be empty"));
            }
            if !seen.insert(d.name.as_str()) {
                return Err(SqlishError::config(format!(
                    "duplicate dialect name: {}",
                    d.name
                )));
            }
        }
        Ok(())
    }

    /// Register the configured dialects, in order.
    pub fn register(&self, registry: &mut DialectRegistry) -> SqlishResult<()> {
        for def in &self.dialects {
            let dialect = def.build(registry)?;
            registry.define(dialect);
        }
        Ok(())
    }

    /// Register the configured dialects and resolve the selected one.
    pub fn resolve_dialect(&self, registry: &mut DialectRegistry) -> SqlishResult<Arc<Dialect>> {
        self.register(registry)?;
        registry
            .get(&self.dialect)
            .ok_or_else(|| SqlishError::config(format!("unknown dialect: {}", self.dialect)))
    }
}

impl Sql {
    /// Create a builder from configuration.
    ///
    /// Configured dialects are added to `registry` before the selected
    /// dialect is looked up.
    pub fn from_config(config: &Config, registry: &mut DialectRegistry) -> SqlishResult<Self> {
        let dialect = config.resolve_dialect(registry)?;
        let mut sql = Sql::with_dialect(dialect);
        sql.set_eol(config.eol.clone()).set_use_utc(config.use_utc);
        Ok(sql)
    }
}
