// Chain benchmarks for ledger-core.
//
// Covers key pair generation, hashing and signing a genesis block, appending
// to a chain, and full verification walks at various chain lengths.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

use ledger_core::crypto::hash::sha256_base64_multi;
use ledger_core::crypto::keys::ChainKeypair;
use ledger_core::crypto::signatures::{sign_hash, verify_hash};
use ledger_core::storage::{Block, BlockId, Chain};

fn build_chain(len: usize) -> (Chain, BlockId) {
    let mut chain = Chain::new(ChainKeypair::generate());
    let genesis = chain.create_genesis("block-0").unwrap();
    let head = chain.append(genesis).unwrap();
    let mut previous = head;
    for i in 1..len {
        previous = chain
            .append(Block::new(format!("block-{:06}", i), Some(previous)))
            .unwrap();
    }
    (chain, head)
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("ed25519/keypair_generate", |b| {
        b.iter(ChainKeypair::generate);
    });
}

fn bench_block_hash(c: &mut Criterion) {
    let previous = "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=";
    let content = "transfer 500 from alice to bob; nonce=42";

    c.bench_function("sha256/block_hash", |b| {
        b.iter(|| sha256_base64_multi(&[previous.as_bytes(), content.as_bytes()]));
    });
}

fn bench_sign_and_verify_hash(c: &mut Criterion) {
    let keypair = ChainKeypair::generate();
    let hash = "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=";
    let signature = sign_hash(&keypair, hash).unwrap();
    let public_key = keypair.public_key();

    c.bench_function("ed25519/sign_hash", |b| {
        b.iter(|| sign_hash(&keypair, hash).unwrap());
    });
    c.bench_function("ed25519/verify_hash", |b| {
        b.iter(|| verify_hash(&public_key, hash, &signature));
    });
}

fn bench_create_genesis(c: &mut Criterion) {
    let chain = Chain::new(ChainKeypair::generate());

    c.bench_function("chain/create_genesis", |b| {
        b.iter(|| chain.create_genesis("hello world").unwrap());
    });
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("chain/append", |b| {
        b.iter_batched(
            || build_chain(16),
            |(mut chain, _)| {
                let tip = chain.tip().unwrap();
                chain.append(Block::new("next", Some(tip))).unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_verify_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/verify_from");

    for size in [10, 100, 1000] {
        let (chain, head) = build_chain(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &chain, |b, chain| {
            b.iter(|| assert!(chain.is_valid(head)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_block_hash,
    bench_sign_and_verify_hash,
    bench_create_genesis,
    bench_append,
    bench_verify_chain,
);
criterion_main!(benches);
