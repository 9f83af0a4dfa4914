use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlsplit::{split_string, Scanner, Settings};

/// A migration-style script with comments, literals and many statements.
fn build_script(statements: usize) -> String {
    let mut script = String::from("/* generated\n   benchmark script */\n");
    for i in 0..statements {
        script.push_str(&format!(
            "-- statement {i}\nINSERT INTO events (id, note) VALUES ({i}, 'a;b -- c /* d */ it\\'s');\n"
        ));
    }
    script
}

fn bench_split_small(c: &mut Criterion) {
    let sql = "SELECT a, b FROM t WHERE x = 'y;z'; -- trailing\nSELECT 2;";
    c.bench_function("split_small", |b| {
        b.iter(|| Scanner::ANSI.split(black_box(sql)))
    });
}

fn bench_split_large(c: &mut Criterion) {
    let sql = build_script(5_000);
    c.bench_function("split_large", |b| {
        b.iter(|| Scanner::ANSI.split(black_box(&sql)))
    });
}

fn bench_strip_large(c: &mut Criterion) {
    let sql = build_script(5_000);
    c.bench_function("strip_large", |b| {
        b.iter(|| Scanner::ANSI.remove_comments(black_box(&sql)))
    });
}

fn bench_tokens_only(c: &mut Criterion) {
    let sql = build_script(5_000);
    c.bench_function("tokens_only", |b| {
        b.iter(|| Scanner::ANSI.tokens(black_box(&sql)).count())
    });
}

/// Dialects differ only in the escape rule; compare both side by side.
fn bench_dialects(c: &mut Criterion) {
    let sql = build_script(5_000);

    let mut group = c.benchmark_group("dialects");
    group.bench_function("ansi", |b| {
        b.iter(|| Scanner::ANSI.split(black_box(&sql)))
    });
    group.bench_function("oracle", |b| {
        b.iter(|| Scanner::ORACLE.split(black_box(&sql)))
    });
    group.finish();
}

fn bench_api_with_settings(c: &mut Criterion) {
    let sql = build_script(1_000);
    let settings = Settings::default();
    c.bench_function("split_string", |b| {
        b.iter(|| split_string(black_box(&sql), black_box(&settings)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_split_small,
    bench_split_large,
    bench_strip_large,
    bench_tokens_only,
    bench_dialects,
    bench_api_with_settings
);
criterion_main!(benches);
