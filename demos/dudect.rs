use dudect_bencher::ctbench_main;
use secp256k1_ct::private_benches::mul_ct;

// Crate the main function to include the constant-time benches
ctbench_main!(
    mul_ct::mul_secret_scalar,
    mul_ct::mul_generator_scalar,
    mul_ct::ecdsa_sign_key
);
