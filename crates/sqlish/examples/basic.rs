//! Basic usage example for sqlish
//!
//! Run with: cargo run --example basic -p sqlish
//!
//! Set RUST_LOG=sqlish=debug to see every rendered statement as a tracing event.

use sqlish::prelude::*;
use sqlish::{Config, VerbMethod};
use std::sync::Arc;

fn main() -> SqlishResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut sql = Sql::new();

    // ============================================
    // Example 1: Schema
    // ============================================
    println!("=== Schema ===");

    let ddl = sql
        .create_table(
            "users",
            [
                ("id", ColumnDef::new("INTEGER").auto_increment().primary_key()),
                ("username", ColumnDef::new("VARCHAR").length(64).not_null()),
                ("email", ColumnDef::new("VARCHAR").length(255)),
            ],
        )?
        .to_sql()?;
    println!("{ddl}");
    let index = sql
        .create_index("i_users_email", &IndexOptions::on("users", "email").unique())?
        .to_sql()?;
    println!("{index}");

    // ============================================
    // Example 2: Writes
    // ============================================
    println!("\n=== Writes ===");

    let insert = sql
        .insert_json(
            "users",
            &serde_json::json!({"username": "alice", "email": "alice@example.com"}),
        )?
        .to_sql()?;
    println!("{insert}");

    let update = sql
        .update("users")?
        .set("email", "alice@example.org")?
        .where_(&Filter::field("username", "alice"))?
        .to_sql()?;
    println!("{update}");

    // ============================================
    // Example 3: Filters
    // ============================================
    println!("\n=== Filters ===");

    let filter = Filter::from_json(&serde_json::json!({
        "$or": [
            {"username": {"$like": {"$regex": "^ali"}}},
            {"id": {"$gte": 10}}
        ]
    }))?;
    let select = sql
        .select(["id", "username"])?
        .from("users")?
        .where_(&filter)?
        .order("id", Some(Direction::Desc))?
        .limit(0, Some(10))?
        .to_sql()?;
    println!("{select}");

    // ============================================
    // Example 4: Dialects
    // ============================================
    println!("\n=== Dialects ===");

    for dialect in [Dialect::sql92(), Dialect::mysql55(), Dialect::sqlite3()] {
        let name = dialect.name().to_string();
        let mut sql = Sql::with_dialect(Arc::new(dialect));
        match sql.set("my_count", 1) {
            Ok(sql) => println!("{name:<10} {}", sql.to_sql()?),
            Err(e) => println!("{name:<10} error: {e}"),
        }
    }

    let config = Config::from_toml_str(
        r#"
        dialect = "NoDeletes"

        [[dialects]]
        name = "NoDeletes"
        based_on = "MySQL55"
        verbs = { deleteFrom = false }
        "#,
    )?;
    let mut registry = DialectRegistry::new();
    let mut sql = Sql::from_config(&config, &mut registry)?;
    if let Err(e) = sql.delete_from("users") {
        println!("{} ({:?} disabled): {e}", sql.dialect().name(), VerbMethod::DeleteFrom);
    }

    Ok(())
}
