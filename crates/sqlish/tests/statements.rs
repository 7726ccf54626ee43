use serde_json::json;
use sqlish::{
    ClauseMethod, Dialect, DialectRegistry, Filter, Sql, SqlStatement, SqlishError, Value,
    VerbMethod, validator,
};
use std::sync::Arc;

fn dialect(name: &str) -> Arc<Dialect> {
    DialectRegistry::new().get(name).unwrap()
}

#[test]
fn registry_lists_builtins_in_order() {
    let registry = DialectRegistry::new();
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["SQL92", "SQLite3", "MySQL55", "PostgreSQL92"]
    );
    assert!(registry.get("Oracle").is_none());
}

#[test]
fn same_calls_render_per_dialect() {
    let mut rendered = Vec::new();
    for name in ["SQL92", "SQLite3", "MySQL55", "PostgreSQL92"] {
        let mut sql = Sql::with_dialect(dialect(name));
        let out = sql
            .select(["id", "name"])
            .and_then(|s| s.from("people"))
            .and_then(|s| s.where_(&Filter::field("name", "O'Hara")))
            .and_then(|s| s.limit(10, Some(5)))
            .and_then(|s| s.to_sql());
        rendered.push(out.unwrap());
    }
    assert_eq!(
        rendered,
        vec![
            r#"SELECT id, name FROM people WHERE name = "O\'Hara" LIMIT 5 OFFSET 10;"#,
            r#"SELECT id, name FROM people WHERE name = "O''Hara" LIMIT 5 OFFSET 10;"#,
            r#"SELECT id, name FROM people WHERE name = "O\'Hara" LIMIT 5 OFFSET 10;"#,
            r#"SELECT id, name FROM people WHERE name = "O\'Hara" LIMIT 5 OFFSET 10;"#,
        ]
    );
}

#[test]
fn switching_dialect_affects_later_calls_only() {
    let mut sql = Sql::new();
    sql.set("x", 1).unwrap();
    sql.set_dialect(dialect("SQLite3"));
    assert_eq!(sql.to_sql().unwrap(), "SET x = 1;");
    assert!(sql.set("x", 2).unwrap_err().is_unsupported());
    assert_eq!(sql.to_sql().unwrap(), "SET x = 1;");
}

#[test]
fn json_filters_end_to_end() {
    let filter = Filter::from_json(&json!({
        "$and": [
            {"name": {"$like": {"$regex": "^Jo"}}},
            {"$or": [{"age": {"$gte": 18}}, {"guardian": true}]}
        ]
    }))
    .unwrap();

    let mut sql = Sql::new();
    let out = sql
        .select("*")
        .unwrap()
        .from("people")
        .unwrap()
        .where_(&filter)
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        out,
        r#"SELECT * FROM people WHERE name LIKE "Jo%" AND age >= 18 OR guardian = true;"#
    );
}

#[test]
fn hostile_json_is_rejected_before_rendering() {
    let mut sql = Sql::new();
    sql.select("id").unwrap().from("t").unwrap();

    for bad in [
        json!({"id; DROP TABLE t": 1}),
        json!({"id": 1, "name": 2}),
        json!([1, 2]),
        json!("id = 1"),
    ] {
        let err = sql.where_json(&bad).unwrap_err();
        assert!(err.is_injection(), "{bad} gave {err}");
    }
    assert!(
        sql.where_json(&json!({"$or": {"a": 1}}))
            .unwrap_err()
            .is_malformed()
    );
    assert!(
        sql.where_json(&json!({"$between": [1, 2]}))
            .unwrap_err()
            .is_malformed()
    );
    assert_eq!(sql.to_sql().unwrap(), "SELECT id FROM t;");
}

#[test]
fn custom_dialect_with_clause_override() {
    let capped = Dialect::builder("Capped")
        .description("Capped SQL")
        .based_on(&Dialect::mysql55())
        .override_clause(ClauseMethod::Limit, |stmt, _| {
            stmt.limit = Some(100);
            stmt.offset = None;
            Ok(())
        })
        .disable_verb(VerbMethod::Union)
        .build();

    let mut registry = DialectRegistry::new();
    registry.define(capped);
    let capped = registry.get("Capped").unwrap();
    assert_eq!(capped.to_string(), "Capped SQL");

    let mut sql = Sql::with_dialect(capped);
    let out = sql
        .select("id")
        .unwrap()
        .from("t")
        .unwrap()
        .limit(5, Some(5000))
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(out, "SELECT id FROM t LIMIT 100;");

    let other = sql.clone();
    let err = sql.union(&other, &other).unwrap_err();
    assert_eq!(err.to_string(), "union not supported by Capped SQL");
}

#[test]
fn validators_can_rewrite_values() {
    let mut sql = Sql::new();
    sql.on(
        "users",
        [
            (
                "email",
                validator(|v| match v.as_text() {
                    Some(s) if s.contains('@') => Ok(Value::from(s.to_lowercase())),
                    _ => Err(SqlishError::injection(format!("users.email, {v}"))),
                }),
            ),
        ],
    );

    let out = sql
        .insert("users", [("email", "Fred@Example.COM")])
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(out, r#"INSERT INTO users (email) VALUES ("fred@example.com");"#);

    let err = sql.insert("users", [("email", "nope")]).unwrap_err();
    assert!(err.is_injection());
    assert!(err.to_string().contains("users.email"));
}

#[test]
fn builders_are_usable_across_threads() {
    let sql = Arc::new({
        let mut sql = Sql::with_dialect(dialect("MySQL55"));
        sql.select("id").unwrap().from("t").unwrap();
        sql
    });
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sql = Arc::clone(&sql);
            std::thread::spawn(move || sql.to_sql().unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), "SELECT id FROM t;");
    }
}
