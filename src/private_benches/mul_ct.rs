use dudect_bencher::{BenchRng, Class, CtRunner};
use rand::Rng;

use crate::{
    arithmetic::{mul_secret, ProjectivePoint, Scalar},
    context::Context,
    ecdsa,
    keys::SecretKey,
};

fn random_scalar(rng: &mut BenchRng) -> Scalar {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    Scalar::reduce_bytes(&bytes)
}

/// Takes a random scalar for the "Left" class and a fixed small one for the "Right" class.
fn scalar_inputs(rng: &mut BenchRng, input_len: usize) -> Vec<(Class, Scalar)> {
    (0..input_len)
        .map(|_| {
            if rng.r#gen::<bool>() {
                // "Normal" class: a random, typically big, value.
                (Class::Left, random_scalar(rng))
            } else {
                // "Special" class: a value with almost all digits zero.
                (Class::Right, Scalar::from_u64(1))
            }
        })
        .collect()
}

/// Is `mul_secret` constant time in the scalar?
pub fn mul_secret_scalar(runner: &mut CtRunner, rng: &mut BenchRng) {
    let point = ProjectivePoint::GENERATOR.double();
    let mut inputs = scalar_inputs(rng, 20_000);
    while let Some((class, k)) = inputs.pop() {
        runner.run_one(class, || mul_secret(&point, &k));
    }
}

/// Is the comb-table generator multiplication constant time in the scalar?
pub fn mul_generator_scalar(runner: &mut CtRunner, rng: &mut BenchRng) {
    let ctx = Context::new();
    let mut inputs = scalar_inputs(rng, 50_000);
    while let Some((class, k)) = inputs.pop() {
        runner.run_one(class, || ctx.mul_generator(&k));
    }
}

/// Is ECDSA signing constant time in the secret key?
pub fn ecdsa_sign_key(runner: &mut CtRunner, rng: &mut BenchRng) {
    let ctx = Context::new();
    let message = [0x5Au8; 32];
    let mut one = [0u8; 32];
    one[31] = 1;

    let mut inputs = (0..10_000)
        .map(|_| {
            let (class, bytes) = if rng.r#gen::<bool>() {
                (Class::Left, random_scalar(rng).to_bytes())
            } else {
                (Class::Right, one)
            };
            let key = SecretKey::from_bytes(&bytes).unwrap_or_else(|_| SecretKey::from_bytes(&one).unwrap());
            (class, key)
        })
        .collect::<Vec<_>>();
    while let Some((class, key)) = inputs.pop() {
        runner.run_one(class, || ecdsa::sign(&ctx, &message, &key));
    }
}
