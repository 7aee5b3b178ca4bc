//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package nanoc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nanoc_lex::Lexer;

fn token_count(source: &str) -> usize {
    let (tokens, _) = Lexer::tokenize(source);
    tokens.len()
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let function_source = r#"
        int add(int a, int b) {
            int result;
            result = a + b;
            return result;
        }

        int main() {
            int x;
            float y;
            x = 5;
            y = 3.14;
            if (x > 0 && y < 10.0) {
                printInt(x);
            }
            while (x > 0) {
                x = x - 1;
            }
            return 0;
        }
    "#;
    group.throughput(Throughput::Bytes(function_source.len() as u64));

    group.bench_function("declaration", |b| {
        b.iter(|| token_count(black_box("int x;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| token_count(black_box(function_source)))
    });

    group.bench_function("string_literal", |b| {
        b.iter(|| token_count(black_box("printStr(\"hello, world\");")))
    });

    group.bench_function("float_literal", |b| {
        b.iter(|| token_count(black_box("float pi; pi = 3.14159;")))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
