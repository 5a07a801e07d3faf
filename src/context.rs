use alloc::vec::Vec;
use core::fmt;

use crate::arithmetic::{
    generator_comb_table, generator_odd_multiples, mul_add_generator_vartime, mul_generator_secret, AffinePoint,
    ProjectivePoint, Scalar, WINDOW_ENTRIES,
};

/// Precomputed generator tables shared by all operations that multiply by `G`.
///
/// A context is expensive to build (about a thousand point additions and a batch inversion)
/// and is immutable afterwards, so build it once and share it by reference
/// (or use [`Context::global`] with the `std` feature).
#[derive(Clone)]
pub struct Context {
    // `comb[i][j - 1] = j * 16^i * G`, used by constant-time generator multiplication.
    comb: Vec<[AffinePoint; WINDOW_ENTRIES]>,
    // `G, 3G, 5G, ...`, used by variable-time generator multiplication.
    generator_odd: Vec<AffinePoint>,
}

static_assertions::assert_impl_all!(Context: Send, Sync);

impl Context {
    /// Builds the precomputed tables.
    pub fn new() -> Self {
        let comb = generator_comb_table();
        let generator_odd = generator_odd_multiples();
        tracing::debug!(
            "Built secp256k1 context: {} comb rows, {} odd multiples",
            comb.len(),
            generator_odd.len()
        );
        Self { comb, generator_odd }
    }

    /// Returns a process-wide context, building it on first use.
    #[cfg(feature = "std")]
    pub fn global() -> &'static Self {
        static GLOBAL: std::sync::OnceLock<Context> = std::sync::OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// `k * G` in constant time.
    pub(crate) fn mul_generator(&self, k: &Scalar) -> ProjectivePoint {
        mul_generator_secret(&self.comb, k)
    }

    /// `a * point + b * G` in variable time; only for public inputs.
    pub(crate) fn mul_add_generator_vartime(&self, a: &Scalar, point: &ProjectivePoint, b: &Scalar) -> ProjectivePoint {
        mul_add_generator_vartime(&self.generator_odd, a, point, b)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("comb_rows", &self.comb.len())
            .field("odd_multiples", &self.generator_odd.len())
            .finish()
    }
}
