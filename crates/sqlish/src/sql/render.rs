//! Statement rendering.

use super::Sql;
use super::statement::{Statement, Verb};
use super::traits::SqlStatement;
use crate::dialect::Dialect;
use crate::error::{SqlishError, SqlishResult};

fn join_strs<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn assignments(values: &[(String, String)]) -> String {
    values
        .iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Assemble the parts of a statement, without terminator.
fn assemble(stmt: &Statement) -> SqlishResult<String> {
    let Some(verb) = stmt.verb else {
        return Err(SqlishError::malformed(
            "Don't know how to assemble SQL statement for verb <none>",
        ));
    };

    let mut parts: Vec<String> = Vec::new();
    match verb {
        Verb::CreateTable => {
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
            parts.push(format!("({})", stmt.definitions.join(", ")));
        }
        Verb::CreateIndex => {
            parts.push(if stmt.unique {
                "CREATE UNIQUE INDEX".to_string()
            } else {
                verb.keyword().to_string()
            });
            parts.push(stmt.name.clone());
            parts.push(format!("ON {} ({})", stmt.target, join_strs(&stmt.columns)));
        }
        Verb::CreateView => {
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
            if let Some(view) = &stmt.view {
                parts.push(format!("AS {view}"));
            }
        }
        Verb::DropTable | Verb::DropIndex | Verb::DropView => {
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
        }
        Verb::Select | Verb::SelectDistinct | Verb::SelectAll => {
            parts.push(verb.keyword().to_string());
            if stmt.columns.is_empty() {
                parts.push("*".to_string());
            } else {
                parts.push(join_strs(&stmt.columns));
            }
            if !stmt.from.is_empty() {
                parts.push(format!("FROM {}", stmt.from.join(", ")));
            }
            if let Some(join) = &stmt.join {
                parts.push(format!("JOIN {} ON ({})", join.tables.join(", "), join.on));
            }
            if let Some(w) = &stmt.where_ {
                parts.push(format!("WHERE {w}"));
            }
            if !stmt.group.is_empty() {
                parts.push(format!("GROUP BY {}", stmt.group.join(", ")));
            }
            if let Some(order) = &stmt.order {
                let mut clause = format!("ORDER BY {}", order.fields.join(", "));
                if let Some(direction) = order.direction {
                    clause.push(' ');
                    clause.push_str(direction.keyword());
                }
                parts.push(clause);
            }
            if let Some(limit) = stmt.limit {
                parts.push(format!("LIMIT {limit}"));
            }
            if let Some(offset) = stmt.offset {
                parts.push(format!("OFFSET {offset}"));
            }
            if !stmt.into.is_empty() {
                parts.push(format!("INTO {}", stmt.into.join(", ")));
            }
        }
        Verb::Insert | Verb::Replace => {
            let (columns, values): (Vec<_>, Vec<_>) =
                stmt.values.iter().map(|(k, v)| (k.as_str(), v.as_str())).unzip();
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
            parts.push(format!("({})", columns.join(", ")));
            parts.push("VALUES".to_string());
            parts.push(format!("({})", values.join(", ")));
        }
        Verb::Update => {
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
            if !stmt.values.is_empty() {
                parts.push("SET".to_string());
                parts.push(assignments(&stmt.values));
            }
            if let Some(w) = &stmt.where_ {
                parts.push(format!("WHERE {w}"));
            }
        }
        Verb::Delete => {
            parts.push(verb.keyword().to_string());
            parts.push(stmt.name.clone());
            if let Some(w) = &stmt.where_ {
                parts.push(format!("WHERE {w}"));
            }
        }
        Verb::Set => {
            parts.push(verb.keyword().to_string());
            if !stmt.values.is_empty() {
                parts.push(assignments(&stmt.values));
            }
        }
        Verb::Union => {
            let Some((left, right)) = &stmt.union else {
                return Err(SqlishError::malformed("UNION needs two statements"));
            };
            parts.push(format!("({left})"));
            parts.push(verb.keyword().to_string());
            parts.push(format!("({right})"));
        }
    }
    Ok(parts.join(" "))
}

impl SqlStatement for Sql {
    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn render(&self, eol: Option<&str>) -> SqlishResult<String> {
        let mut out = assemble(&self.sql)?;
        out.push_str(eol.unwrap_or(&self.eol));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlish.sql",
            dialect = %self.dialect.name(),
            verb = ?self.sql.verb,
            sql = %out,
            "rendered statement"
        );

        Ok(out)
    }
}
