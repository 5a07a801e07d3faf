//! Constant-time arithmetic over the secp256k1 base field, scalar field and group.

mod field;
mod limbs;
mod mul;
mod point;
mod scalar;

pub(crate) use field::FieldElement;
pub(crate) use mul::{
    generator_comb_table, generator_odd_multiples, mul_add_generator_vartime, mul_generator_secret, mul_secret,
    mul_vartime, WINDOW_ENTRIES,
};
pub(crate) use point::{AffinePoint, ProjectivePoint};
pub(crate) use scalar::Scalar;
