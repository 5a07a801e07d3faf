// This module contains benchmarks for code that is not part of the public API
// and is used for testing and performance evaluation purposes.

// Benchmarks for field and group arithmetic.
pub mod scalar_mul;

// Constant-time benchmarks.
#[cfg(feature = "dudect-bencher")]
pub mod mul_ct;
