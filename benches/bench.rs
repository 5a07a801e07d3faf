use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand_core::OsRng;
use secp256k1_ct::{ecdsa, schnorr, Context, Keypair, SecretKey, SharedSecret};

fn bench_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("Signatures");
    let ctx = Context::new();
    let keypair = Keypair::random(&ctx, &mut OsRng).unwrap();
    let message = [1u8; 32];

    group.bench_function("ECDSA sign", |b| {
        b.iter(|| black_box(ecdsa::sign(&ctx, &message, keypair.secret_key())))
    });

    let signature = ecdsa::sign(&ctx, &message, keypair.secret_key());
    group.bench_function("ECDSA verify", |b| {
        b.iter(|| black_box(ecdsa::verify(&ctx, &message, &signature, &keypair.public_key())))
    });

    let recoverable = ecdsa::sign_recoverable(&ctx, &message, keypair.secret_key());
    group.bench_function("ECDSA recover", |b| {
        b.iter(|| black_box(ecdsa::recover(&ctx, &message, &recoverable).unwrap()))
    });

    group.bench_function("Schnorr sign", |b| {
        b.iter(|| black_box(schnorr::sign(&ctx, &message, &keypair, &[0u8; 32]).unwrap()))
    });

    let (x_only, _) = keypair.x_only_public_key();
    let signature = schnorr::sign(&ctx, &message, &keypair, &[0u8; 32]).unwrap();
    group.bench_function("Schnorr verify", |b| {
        b.iter(|| black_box(schnorr::verify(&ctx, &message, &signature, &x_only)))
    });

    group.finish()
}

fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("Keys");
    let ctx = Context::new();

    group.bench_function("key generation", |b| {
        b.iter(|| black_box(Keypair::random(&ctx, &mut OsRng).unwrap()))
    });

    let peer = SecretKey::random(&mut OsRng).unwrap().public_key(&ctx);
    group.bench_function("ECDH", |b| {
        b.iter_batched(
            || SecretKey::random(&mut OsRng).unwrap(),
            |secret_key| black_box(SharedSecret::new(&peer, &secret_key)),
            BatchSize::SmallInput,
        )
    });

    group.finish()
}

criterion_group!(benches, bench_signatures, bench_keys);
criterion_main!(benches);
