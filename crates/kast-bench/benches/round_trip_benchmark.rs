use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kast_core::{KastParser, ParserConfiguration, Writer, cst};
use std::hint::black_box;

const SERVICE: &str = r#"package com.example.orders

import java.time.Instant
import kotlin.math.max

/** Keeps track of open orders */
class OrderService(private val repository: Repository<Order>) {
    private val cache = mutableMapOf<Long, Order>()

    fun find(id: Long): Order? = cache[id] ?: repository.load(id)?.also { cache[id] = it }

    fun total(customer: String): Long {
        var sum = 0L
        for (order in repository.all()) {
            if (order.customer != customer) continue
            sum += order.amount // cents
        }
        return max(sum, 0)
    }

    fun describe(order: Order) = when (order.state) {
        State.OPEN -> "open since ${order.created}"
        State.CLOSED, State.CANCELLED -> "done"
        else -> "unknown"
    }
}
"#;

fn generated(classes: usize) -> String {
    let mut source = String::from("package bench\n\n");
    for i in 0..classes {
        source.push_str(&format!(
            "class Item{i}(val id: Int) {{\n    fun weight() = id * {i} + 1 // weight\n}}\n\n"
        ));
    }
    source
}

/// Benchmark the front-end alone
fn bench_cst(c: &mut Criterion) {
    let mut group = c.benchmark_group("cst");
    group.throughput(Throughput::Bytes(SERVICE.len() as u64));
    group.bench_function("service", |b| {
        b.iter(|| black_box(cst::parse_kotlin(SERVICE, cst::SourceKind::File)));
    });
    group.finish();
}

/// Benchmark parsing into nodes, with and without extras
fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let plain = KastParser::default();
    let lossless = KastParser::new(ParserConfiguration::file().lossless());

    group.bench_function("plain", |b| b.iter(|| black_box(plain.parse(SERVICE))));
    group.bench_function("lossless", |b| b.iter(|| black_box(lossless.parse(SERVICE))));
    group.finish();
}

/// Benchmark lossless round trips over growing files
fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    let parser = KastParser::new(ParserConfiguration::file().lossless());
    let writer = Writer::with_extras();

    for &size in &[10, 100, 500] {
        let source = generated(size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let root = parser.parse(source).ok()?;
                Some(black_box(writer.write(&root)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cst, bench_parser, bench_round_trip);
criterion_main!(benches);
