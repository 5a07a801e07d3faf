use alloc::vec::Vec;

use crypto_bigint::subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::DefaultIsZeroes;

use super::field::FieldElement;

const GENERATOR_X: FieldElement = FieldElement::from_limbs_unchecked([
    0x59F2_815B_16F8_1798,
    0x029B_FCDB_2DCE_28D9,
    0x55A0_6295_CE87_0B07,
    0x79BE_667E_F9DC_BBAC,
]);

const GENERATOR_Y: FieldElement = FieldElement::from_limbs_unchecked([
    0x9C47_D08F_FB10_D4B8,
    0xFD17_B448_A685_5419,
    0x5DA4_FBFC_0E11_08A8,
    0x483A_DA77_26A3_C465,
]);

/// A curve point in affine coordinates, or the point at infinity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AffinePoint {
    x: FieldElement,
    y: FieldElement,
    // 1 for the point at infinity
    infinity: u8,
}

impl AffinePoint {
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    #[cfg(test)]
    pub const GENERATOR: Self = Self {
        x: GENERATOR_X,
        y: GENERATOR_Y,
        infinity: 0,
    };

    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    pub fn x(&self) -> FieldElement {
        self.x
    }

    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Builds a point from coordinates, checking that they satisfy the curve equation.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> CtOption<Self> {
        let point = Self { x, y, infinity: 0 };
        CtOption::new(point, point.is_on_curve())
    }

    /// Recovers the point with the given x coordinate and y parity.
    pub fn decompress(x: FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        let rhs = x.square() * x + FieldElement::CURVE_B;
        rhs.sqrt().map(|y| {
            let mut y = y;
            y.conditional_negate(y.is_odd() ^ y_is_odd);
            Self { x, y, infinity: 0 }
        })
    }

    fn is_on_curve(&self) -> Choice {
        let rhs = self.x.square() * self.x + FieldElement::CURVE_B;
        self.y.square().ct_eq(&rhs)
    }

    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }

    pub fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint::conditional_select(
            &ProjectivePoint {
                x: self.x,
                y: self.y,
                z: FieldElement::ONE,
            },
            &ProjectivePoint::IDENTITY,
            self.is_identity(),
        )
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let both_identity = self.is_identity() & other.is_identity();
        let same_point = !self.is_identity()
            & !other.is_identity()
            & self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y);
        both_identity | same_point
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

// Zeroizing resets to the point at infinity.
impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for AffinePoint {}

/// A curve point in Jacobian coordinates: `x = X / Z^2`, `y = Y / Z^3`.
///
/// `Z = 0` encodes the point at infinity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ProjectivePoint {
    pub const IDENTITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    pub const GENERATOR: Self = Self {
        x: GENERATOR_X,
        y: GENERATOR_Y,
        z: FieldElement::ONE,
    };

    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    pub fn to_affine(&self) -> AffinePoint {
        let z_inv = self.z.invert_unchecked();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2 * z_inv;
        AffinePoint::conditional_select(
            &AffinePoint {
                x: self.x * z_inv2,
                y: self.y * z_inv3,
                infinity: 0,
            },
            &AffinePoint::IDENTITY,
            self.is_identity(),
        )
    }

    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Point doubling ("dbl-2009-l" for `a = 0`).
    ///
    /// The identity doubles to itself since `Z3 = 2 Y1 Z1`; there are no points of order two.
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.mul_small(3);
        let f = e.square();
        let x3 = f - d.double();
        let y3 = e * (d - x3) - c.mul_small(8);
        let z3 = (self.y * self.z).double();
        Self { x: x3, y: y3, z: z3 }
    }

    /// Generic addition ("add-2007-bl") without handling of exceptional cases.
    ///
    /// Returns the raw sum together with flags telling whether the inputs had equal
    /// x coordinates (`h == 0`) and equal y coordinates (`r == 0`).
    fn add_incomplete(&self, other: &Self) -> (Self, Choice, Choice) {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * other.z * z2z2;
        let s2 = other.y * self.z * z1z1;
        let h = u2 - u1;
        let i = h.double().square();
        let j = h * i;
        let r = (s2 - s1).double();
        let v = u1 * i;
        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;
        (Self { x: x3, y: y3, z: z3 }, h.is_zero(), r.is_zero())
    }

    /// Constant-time complete addition.
    pub fn add(&self, other: &Self) -> Self {
        let (sum, same_x, same_y) = self.add_incomplete(other);
        // Equal x with different y yields `Z3 = 0`, the correct result for `P + (-P)`.
        let mut res = Self::conditional_select(&sum, &self.double(), same_x & same_y);
        res.conditional_assign(other, self.is_identity());
        res.conditional_assign(self, other.is_identity());
        res
    }

    /// Mixed addition ("madd-2007-bl") with an affine point, without exceptional cases.
    fn add_mixed_incomplete(&self, other: &AffinePoint) -> (Self, Choice, Choice) {
        let z1z1 = self.z.square();
        let u2 = other.x * z1z1;
        let s2 = other.y * self.z * z1z1;
        let h = u2 - self.x;
        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let r = (s2 - self.y).double();
        let v = self.x * i;
        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - z1z1 - hh;
        (Self { x: x3, y: y3, z: z3 }, h.is_zero(), r.is_zero())
    }

    /// Constant-time complete addition of an affine point.
    pub fn add_mixed(&self, other: &AffinePoint) -> Self {
        let (sum, same_x, same_y) = self.add_mixed_incomplete(other);
        let mut res = Self::conditional_select(&sum, &self.double(), same_x & same_y);
        res.conditional_assign(&other.to_projective(), self.is_identity());
        res.conditional_assign(self, other.is_identity());
        res
    }

    /// Variable-time addition, for public inputs only.
    pub fn add_vartime(&self, other: &Self) -> Self {
        if bool::from(self.is_identity()) {
            return *other;
        }
        if bool::from(other.is_identity()) {
            return *self;
        }
        let (sum, same_x, same_y) = self.add_incomplete(other);
        if bool::from(same_x & same_y) {
            return self.double();
        }
        sum
    }

    /// Variable-time mixed addition, for public inputs only.
    pub fn add_mixed_vartime(&self, other: &AffinePoint) -> Self {
        if bool::from(other.is_identity()) {
            return *self;
        }
        if bool::from(self.is_identity()) {
            return other.to_projective();
        }
        let (sum, same_x, same_y) = self.add_mixed_incomplete(other);
        if bool::from(same_x & same_y) {
            return self.double();
        }
        sum
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    /// Compares `X1 Z2^2 == X2 Z1^2` and `Y1 Z2^3 == Y2 Z1^3`, treating all identities as equal.
    fn ct_eq(&self, other: &Self) -> Choice {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let same_x = (self.x * z2z2).ct_eq(&(other.x * z1z1));
        let same_y = (self.y * z2z2 * other.z).ct_eq(&(other.y * z1z1 * self.z));
        let both_identity = self.is_identity() & other.is_identity();
        let neither_identity = !self.is_identity() & !other.is_identity();
        both_identity | (neither_identity & same_x & same_y)
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for ProjectivePoint {}

/// Converts projective points to affine ones with a single field inversion.
pub(crate) fn batch_normalize(points: &[ProjectivePoint]) -> Vec<AffinePoint> {
    // Identities get a unit Z so that they don't zero out the running product.
    let zs = points
        .iter()
        .map(|p| FieldElement::conditional_select(&p.z, &FieldElement::ONE, p.is_identity()))
        .collect::<Vec<_>>();

    let mut prefix = Vec::with_capacity(zs.len());
    let mut acc = FieldElement::ONE;
    for z in zs.iter() {
        prefix.push(acc);
        acc *= *z;
    }

    let mut acc_inv = acc.invert_unchecked();
    let mut result = Vec::with_capacity(points.len());
    for ((point, z), before) in points.iter().zip(zs.iter()).zip(prefix.iter()).rev() {
        let z_inv = acc_inv * *before;
        acc_inv *= *z;
        let z_inv2 = z_inv.square();
        result.push(AffinePoint::conditional_select(
            &AffinePoint {
                x: point.x * z_inv2,
                y: point.y * z_inv2 * z_inv,
                infinity: 0,
            },
            &AffinePoint::IDENTITY,
            point.is_identity(),
        ));
    }
    result.reverse();
    result
}
