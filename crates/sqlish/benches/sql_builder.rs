use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlish::{Filter, Sql, SqlStatement, Value};

fn columns(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("col{i}")).collect()
}

/// SELECT col0, col1, ... FROM t WHERE col0 = 0 AND col1 = 1 ...
fn build_select(n: usize) -> Sql {
    let mut sql = Sql::new();
    let filter = Filter::and((0..n).map(|i| Filter::field(format!("col{i}"), i as i64)).collect());
    sql.select(columns(n))
        .and_then(|s| s.from("t"))
        .and_then(|s| s.where_(&filter))
        .expect("valid select");
    sql
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let sql = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(sql.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let sql = build_select(n);
                black_box(sql.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert");

    for n in [5, 20, 100] {
        let row: Vec<(String, Value)> = columns(n)
            .into_iter()
            .enumerate()
            .map(|(i, c)| (c, Value::from(format!("value {i}"))))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &row, |b, row| {
            b.iter(|| {
                let mut sql = Sql::new();
                sql.insert("t", row.iter().cloned()).expect("valid insert");
                black_box(sql.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_filter_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/filter_json");

    for n in [1, 5, 10, 50] {
        let clauses: Vec<serde_json::Value> = (0..n)
            .map(|i| serde_json::json!({ format!("col{i}"): { "$gte": i } }))
            .collect();
        let json = serde_json::json!({ "$or": clauses });
        group.bench_with_input(BenchmarkId::from_parameter(n), &json, |b, json| {
            b.iter(|| {
                let filter = Filter::from_json(json).expect("valid filter");
                black_box(sqlish::expr(&filter))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_insert,
    bench_filter_json
);
criterion_main!(benches);
