//! Criterion benchmarks for WRAITH crypto: keygen, generate, check, view tag, recovery.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wraith_crypto::{generate_keypair, generate_stealth_keys, DefaultSuite, EthereumSuite};

fn bench_keygen(c: &mut Criterion) {
    let mut g = c.benchmark_group("keygen");
    g.throughput(Throughput::Elements(1));
    g.bench_function("generate_keypair", |b| {
        b.iter(|| black_box(generate_keypair()).unwrap());
    });
    g.finish();
}

fn bench_generate(c: &mut Criterion) {
    let keys = generate_stealth_keys().unwrap();
    let meta = keys.meta_address();
    let mut g = c.benchmark_group("generate_stealth_address");
    g.throughput(Throughput::Elements(1));
    g.bench_function("sha256_cosmos", |b| {
        let suite = DefaultSuite::new();
        b.iter(|| black_box(suite.generate_stealth_address(&meta)).unwrap());
    });
    g.bench_function("keccak256_ethereum", |b| {
        let suite = EthereumSuite::new();
        b.iter(|| black_box(suite.generate_stealth_address(&meta)).unwrap());
    });
    g.finish();
}

fn bench_check(c: &mut Criterion) {
    let suite = DefaultSuite::new();
    let keys = generate_stealth_keys().unwrap();
    let generated = suite.generate_stealth_address(&keys.meta_address()).unwrap();

    let mut g = c.benchmark_group("scan");
    g.throughput(Throughput::Elements(1));
    g.bench_function("check_stealth_address", |b| {
        b.iter(|| {
            black_box(suite.check_stealth_address(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.public,
            ))
            .unwrap()
        });
    });
    g.bench_function("check_view_tag", |b| {
        b.iter(|| {
            black_box(suite.check_view_tag(
                &generated.ephemeral_public_key,
                &keys.view.secret,
                generated.view_tag,
            ))
            .unwrap()
        });
    });
    g.finish();
}

fn bench_recover(c: &mut Criterion) {
    let suite = DefaultSuite::new();
    let keys = generate_stealth_keys().unwrap();
    let generated = suite.generate_stealth_address(&keys.meta_address()).unwrap();

    let mut g = c.benchmark_group("recover");
    g.throughput(Throughput::Elements(1));
    g.bench_function("compute_stealth_key", |b| {
        b.iter(|| {
            black_box(suite.compute_stealth_key(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.secret,
            ))
            .unwrap()
        });
    });
    g.finish();
}

criterion_group!(benches, bench_keygen, bench_generate, bench_check, bench_recover);
criterion_main!(benches);
