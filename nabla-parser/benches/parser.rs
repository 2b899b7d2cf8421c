use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use nabla_parser::parser::Parser;
use nabla_source::{tokenize, Token, TokenKind};

fn significant(source: &str) -> Vec<Token<'_>> {
    tokenize(source)
        .into_iter()
        .filter(|tok| tok.kind != TokenKind::Space && tok.kind != TokenKind::Comment)
        .collect()
}

fn parse(tokens: &[Token]) {
    Parser::new(tokens).parse_tree().expect("parse error");
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = "print(1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    source.push_str(");");

    let tokens = significant(&source);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| parse(&tokens)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "let x = 1".to_string();
    for _i in 0..200 {
        source.push_str(" + 2 * 3 / 4 - 5");
    }
    source.push(';');

    let tokens = significant(&source);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| parse(&tokens)));
}

criterion_group!(benches, long_expr, stress_precedence);
criterion_main!(benches);
