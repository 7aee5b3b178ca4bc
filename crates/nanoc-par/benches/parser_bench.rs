//! Parser benchmarks: lex-then-parse over representative C-like sources.
//! Run with `cargo bench --package nanoc-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nanoc_lex::Lexer;
use nanoc_par::parse;

fn parse_source(source: &str) {
    let (tokens, _) = Lexer::tokenize(source);
    let _ = parse(tokens, false);
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "void main() { int x = 42; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("declaration", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        int add(int a, int b) {
            return a + b;
        }

        int fib(int n) {
            if (n <= 1) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }

        void main() {
            int result = add(fib(5), fib(6));
            printInt(result);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("functions", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        int sum_to(int n) {
            int sum = 0;
            int i = 0;
            while (i < n) {
                sum = sum + i;
                i = i + 1;
            }
            return sum;
        }

        void main() {
            int n = 10;
            if (n > 0) {
                printInt(sum_to(n));
            } else {
                printInt(0);
            }

            int j = 0;
            do {
                j = j + 1;
            } while (j < n);
            printInt(j);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("control_flow", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_globals_and_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_globals_and_io");

    let source = r#"
        int counter = 0;
        float ratio = 0.5;

        void tick() {
            counter = counter + 1;
        }

        void main() {
            int x;
            x = scanInt();
            printStr("you entered: ");
            printInt(x);
            printFloat(ratio);
            tick();
            tick();
            printInt(counter);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("globals_and_io", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_recovery");

    let source = r#"
        void main() {
            x = 1;
            y = 2;
            int z = 3;
            printInt(z);
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("batched_errors", |b| {
        b.iter(|| {
            let (tokens, _) = Lexer::tokenize(black_box(source));
            let _ = parse(tokens, true);
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_control_flow,
    bench_parser_globals_and_io,
    bench_parser_recovery
);
criterion_main!(benches);
