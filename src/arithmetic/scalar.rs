use core::ops::{Add, Mul, Neg, Sub};

use crypto_bigint::subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use rand_core::CryptoRngCore;
use zeroize::DefaultIsZeroes;

use super::{
    field::FieldElement,
    limbs::{self, Limbs},
};

/// The order of the secp256k1 group.
const ORDER: Limbs = [
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// 2^256 - n
const COMPLEMENT: Limbs = [0x402D_A173_2FC9_BEBF, 0x4551_2319_50B7_5FC4, 1, 0];

const ORDER_MINUS_TWO: Limbs = [
    0xBFD2_5E8C_D036_413F,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// floor(n / 2)
const HALF_ORDER: Limbs = [
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// An integer modulo the curve order, always kept fully reduced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Scalar(Limbs);

impl DefaultIsZeroes for Scalar {}

impl Scalar {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);

    #[cfg(any(test, all(feature = "private-benches", feature = "dudect-bencher")))]
    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    /// The big-endian encoding of the group order.
    #[cfg(test)]
    pub fn order_bytes() -> [u8; 32] {
        limbs::to_be_bytes(&ORDER)
    }

    /// Decodes a big-endian encoding, rejecting values that are not below the group order.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let limbs = limbs::from_be_bytes(bytes);
        CtOption::new(Self(limbs), limbs::ct_lt(&limbs, &ORDER))
    }

    /// Interprets 32 big-endian bytes as an integer and reduces it modulo the group order.
    ///
    /// Since `2^256 < 2n`, a single conditional subtraction is enough.
    pub fn reduce_bytes(bytes: &[u8; 32]) -> Self {
        Self(limbs::reduce_once(&limbs::from_be_bytes(bytes), &ORDER))
    }

    /// Samples a scalar by reducing 32 random bytes; the bias is below `2^-127`.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self::reduce_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        limbs::to_be_bytes(&self.0)
    }

    /// Reduces a field element modulo the group order.
    ///
    /// The second value is set if the reduction changed the value (`x >= n`).
    pub fn from_field_element(x: &FieldElement) -> (Self, Choice) {
        let bytes = x.to_bytes();
        let reduced = Self::reduce_bytes(&bytes);
        let overflow = !Self::from_bytes(&bytes).is_some();
        (reduced, overflow)
    }

    /// Returns the scalar, or the scalar plus the group order if `add_order` is set,
    /// as a field element, provided the value is below the field modulus.
    pub fn to_field_element(&self, add_order: Choice) -> CtOption<FieldElement> {
        let (sum, carry) = limbs::add(&self.0, &ORDER);
        let candidate = limbs::select(&self.0, &sum, add_order);
        let overflow = Choice::from((carry & 1) as u8) & add_order;
        FieldElement::from_bytes(&limbs::to_be_bytes(&candidate)).and_then(|x| CtOption::new(x, !overflow))
    }

    pub(crate) fn limbs(&self) -> &Limbs {
        &self.0
    }

    /// Returns the 4-bit digit at position `index` (0 is the least significant).
    ///
    /// `index` is public, the digit value is not inspected.
    pub(crate) fn nibble(&self, index: usize) -> u8 {
        let word = self.0.get(index / 16).copied().unwrap_or(0);
        ((word >> ((index % 16) * 4)) & 0xF) as u8
    }

    pub fn is_zero(&self) -> Choice {
        limbs::is_zero(&self.0)
    }

    /// Returns true if the scalar is greater than `n / 2`.
    pub fn is_high(&self) -> Choice {
        limbs::ct_lt(&HALF_ORDER, &self.0)
    }

    pub fn negate(&self) -> Self {
        Self(limbs::sub_mod(&[0; 4], &self.0, &ORDER))
    }

    /// Inversion via Fermat's little theorem; `None` for zero.
    pub fn invert(&self) -> CtOption<Self> {
        let inverse = Self(limbs::pow_public(&self.0, &ORDER_MINUS_TWO, &ORDER, &COMPLEMENT));
        CtOption::new(inverse, !self.is_zero())
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(limbs::select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        limbs::ct_eq(&self.0, &other.0)
    }
}

impl Add for Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(limbs::add_mod(&self.0, &rhs.0, &ORDER))
    }
}

impl Sub for Scalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(limbs::sub_mod(&self.0, &rhs.0, &ORDER))
    }
}

impl Mul for Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(limbs::mul_mod(&self.0, &rhs.0, &ORDER, &COMPLEMENT))
    }
}

impl Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        self.negate()
    }
}

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.negate()
    }
}
