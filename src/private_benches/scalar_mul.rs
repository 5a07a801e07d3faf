use criterion::{black_box, BatchSize, Bencher, Criterion};
use rand::SeedableRng;

use crate::{
    arithmetic::{mul_secret, mul_vartime, ProjectivePoint, Scalar},
    context::Context,
};

pub fn bench_scalar_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scalar multiplication");
    let ctx = Context::new();
    let point = ProjectivePoint::GENERATOR.double();

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1234567890);
    group.bench_function("k * P, constant time", |b: &mut Bencher<'_>| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |k| black_box(mul_secret(&point, &k)),
            BatchSize::SmallInput,
        );
    });

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1234567890);
    group.bench_function("k * G, constant time", |b: &mut Bencher<'_>| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |k| black_box(ctx.mul_generator(&k)),
            BatchSize::SmallInput,
        );
    });

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1234567890);
    group.bench_function("k * P, variable time", |b: &mut Bencher<'_>| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |k| black_box(mul_vartime(&point, &k)),
            BatchSize::SmallInput,
        );
    });

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1234567890);
    group.bench_function("a * P + b * G, variable time", |b: &mut Bencher<'_>| {
        b.iter_batched(
            || (Scalar::random(&mut rng), Scalar::random(&mut rng)),
            |(a, b)| black_box(ctx.mul_add_generator_vartime(&a, &point, &b)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("scalar inversion", |b: &mut Bencher<'_>| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |k| black_box(k.invert()),
            BatchSize::SmallInput,
        );
    });

    group.sample_size(10);
    group.bench_function("context creation", |b: &mut Bencher<'_>| b.iter(Context::new));

    group.finish()
}
