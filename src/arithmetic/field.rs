use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crypto_bigint::subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::DefaultIsZeroes;

use super::limbs::{self, Limbs};

/// p = 2^256 - 2^32 - 977
const MODULUS: Limbs = [
    0xFFFF_FFFE_FFFF_FC2F,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// 2^256 - p
const COMPLEMENT: Limbs = [0x1_0000_03D1, 0, 0, 0];

const MODULUS_MINUS_TWO: Limbs = [
    0xFFFF_FFFE_FFFF_FC2D,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// (p + 1) / 4, valid as a square root exponent since p = 3 mod 4.
const SQRT_EXPONENT: Limbs = [
    0xFFFF_FFFF_BFFF_FF0C,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0x3FFF_FFFF_FFFF_FFFF,
];

/// An element of the base field of secp256k1, always kept fully reduced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldElement(Limbs);

impl DefaultIsZeroes for FieldElement {}

impl FieldElement {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// The `b` coefficient of the curve equation `y^2 = x^3 + 7`.
    pub const CURVE_B: Self = Self([7, 0, 0, 0]);

    /// Creates an element from little-endian limbs that are known to be below the modulus.
    pub(crate) const fn from_limbs_unchecked(limbs: Limbs) -> Self {
        Self(limbs)
    }

    /// Decodes a big-endian encoding, rejecting values that are not below the modulus.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let limbs = limbs::from_be_bytes(bytes);
        CtOption::new(Self(limbs), limbs::ct_lt(&limbs, &MODULUS))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        limbs::to_be_bytes(&self.0)
    }

    pub fn is_zero(&self) -> Choice {
        limbs::is_zero(&self.0)
    }

    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    pub fn double(&self) -> Self {
        *self + *self
    }

    pub fn square(&self) -> Self {
        *self * *self
    }

    pub fn negate(&self) -> Self {
        Self(limbs::sub_mod(&[0; 4], &self.0, &MODULUS))
    }

    /// Multiplies by a small constant through repeated doubling and addition.
    pub fn mul_small(&self, k: u32) -> Self {
        let mut res = Self::ZERO;
        for bit in (0..32).rev() {
            res = res.double();
            if (k >> bit) & 1 == 1 {
                res += *self;
            }
        }
        res
    }

    /// Inversion via Fermat's little theorem.
    ///
    /// Zero maps to zero.
    pub(crate) fn invert_unchecked(&self) -> Self {
        Self(limbs::pow_public(&self.0, &MODULUS_MINUS_TWO, &MODULUS, &COMPLEMENT))
    }

    #[cfg(test)]
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.invert_unchecked(), !self.is_zero())
    }

    /// Returns the square root with an arbitrary parity, if one exists.
    pub fn sqrt(&self) -> CtOption<Self> {
        let root = Self(limbs::pow_public(&self.0, &SQRT_EXPONENT, &MODULUS, &COMPLEMENT));
        CtOption::new(root, root.square().ct_eq(self))
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(limbs::select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        limbs::ct_eq(&self.0, &other.0)
    }
}

impl Add for FieldElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(limbs::add_mod(&self.0, &rhs.0, &MODULUS))
    }
}

impl Sub for FieldElement {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(limbs::sub_mod(&self.0, &rhs.0, &MODULUS))
    }
}

impl Mul for FieldElement {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(limbs::mul_mod(&self.0, &rhs.0, &MODULUS, &COMPLEMENT))
    }
}

impl Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self {
        self.negate()
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        self.negate()
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FieldElement {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
