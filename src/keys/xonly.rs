use core::fmt;

use crypto_bigint::subtle::Choice;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::public::PublicKey;
use crate::{
    arithmetic::{AffinePoint, FieldElement},
    context::Context,
    error::Error,
    tools::serde::{self as serde_bytes, TryFromBytes},
};

/// The parity of the y coordinate dropped when converting a point to its x-only form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Even y coordinate.
    Even,
    /// Odd y coordinate.
    Odd,
}

impl Parity {
    /// Returns 0 for [`Parity::Even`] and 1 for [`Parity::Odd`].
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }

    /// The inverse of [`Parity::to_u8`]; any value other than 0 or 1 is rejected.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Even),
            1 => Some(Self::Odd),
            _ => None,
        }
    }

    pub(crate) fn of(point: &AffinePoint) -> Self {
        if bool::from(point.y().is_odd()) {
            Self::Odd
        } else {
            Self::Even
        }
    }
}

/// A BIP-340 public key: a curve point identified by its x coordinate alone,
/// with the y coordinate implicitly even.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct XOnlyPublicKey(AffinePoint);

impl XOnlyPublicKey {
    /// Parses a 32-byte x coordinate (the BIP-340 `lift_x` operation).
    ///
    /// Fails if the coordinate is not below the field modulus or has no curve point.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        let x = Option::<FieldElement>::from(FieldElement::from_bytes(bytes)).ok_or(Error::InvalidPublicKey)?;
        let point = Option::from(AffinePoint::decompress(x, Choice::from(0))).ok_or(Error::InvalidPublicKey)?;
        Ok(Self(point))
    }

    /// Same as [`XOnlyPublicKey::from_bytes`], for a slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    /// Returns the 32-byte x coordinate.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.x().to_bytes()
    }

    /// Drops the y parity of a full public key.
    pub fn from_public_key(public_key: &PublicKey) -> (Self, Parity) {
        let point = *public_key.as_affine();
        let parity = Parity::of(&point);
        let mut even = point;
        if parity == Parity::Odd {
            even = point.negate();
        }
        (Self(even), parity)
    }

    /// Returns the full public key with the given y parity.
    pub fn public_key(&self, parity: Parity) -> PublicKey {
        let mut point = self.0;
        if parity == Parity::Odd {
            point = point.negate();
        }
        PublicKey::from_affine(point).expect("x-only keys are never the point at infinity")
    }

    /// Computes `Q = P + t * G` for the even-y point `P`,
    /// returning `Q` in x-only form together with its parity (BIP-341 key tweaking).
    pub fn add_tweak(&self, ctx: &Context, tweak: &[u8; 32]) -> Result<(Self, Parity), Error> {
        let tweaked = self.public_key(Parity::Even).add_exp_tweak(ctx, tweak)?;
        Ok(tweaked.x_only_public_key())
    }

    /// Checks that `tweaked` with `tweaked_parity` is the result of [`XOnlyPublicKey::add_tweak`]
    /// applied to `self` with `tweak`.
    pub fn tweak_add_check(&self, ctx: &Context, tweaked: &Self, tweaked_parity: Parity, tweak: &[u8; 32]) -> bool {
        match self.add_tweak(ctx, tweak) {
            Ok((expected, parity)) => &expected == tweaked && parity == tweaked_parity,
            Err(_) => false,
        }
    }

    pub(crate) fn as_affine(&self) -> &AffinePoint {
        &self.0
    }
}

impl fmt::Debug for XOnlyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XOnlyPublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl From<PublicKey> for XOnlyPublicKey {
    fn from(public_key: PublicKey) -> Self {
        Self::from_public_key(&public_key).0
    }
}

impl TryFromBytes for XOnlyPublicKey {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Serialize for XOnlyPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_bytes::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for XOnlyPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;

    use super::{Parity, XOnlyPublicKey};
    use crate::{arithmetic::Scalar, context::Context, error::Error, keys::SecretKey};

    #[test]
    fn lift_x() {
        let ctx = Context::new();
        let pk = SecretKey::random(&mut OsRng).unwrap().public_key(&ctx);
        let (xonly, parity) = pk.x_only_public_key();
        assert_eq!(xonly.to_bytes(), pk.to_compressed_bytes()[1..]);
        assert_eq!(parity.to_u8(), pk.to_compressed_bytes()[0] - 2);

        let lifted = XOnlyPublicKey::from_bytes(&xonly.to_bytes()).unwrap();
        assert_eq!(lifted, xonly);
        assert_eq!(lifted.public_key(parity), pk);

        let mut no_point = [0u8; 32];
        no_point[31] = 5;
        assert_eq!(XOnlyPublicKey::from_bytes(&no_point).unwrap_err(), Error::InvalidPublicKey);
        assert_eq!(XOnlyPublicKey::from_bytes(&[0xFF; 32]).unwrap_err(), Error::InvalidPublicKey);
    }

    #[test]
    fn tweak_and_check() {
        let ctx = Context::new();
        let pk = SecretKey::random(&mut OsRng).unwrap().public_key(&ctx);
        let (internal, _) = pk.x_only_public_key();
        let tweak = Scalar::random(&mut OsRng).to_bytes();

        let (tweaked, parity) = internal.add_tweak(&ctx, &tweak).unwrap();
        assert!(internal.tweak_add_check(&ctx, &tweaked, parity, &tweak));

        let wrong_parity = if parity == Parity::Even { Parity::Odd } else { Parity::Even };
        assert!(!internal.tweak_add_check(&ctx, &tweaked, wrong_parity, &tweak));
        assert!(!internal.tweak_add_check(&ctx, &internal, parity, &tweak));
    }

    #[test]
    fn parity_encoding() {
        assert_eq!(Parity::from_u8(Parity::Odd.to_u8()), Some(Parity::Odd));
        assert_eq!(Parity::from_u8(2), None);
    }
}
