use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    secret::{parse_tweak, SecretKey},
    xonly::{Parity, XOnlyPublicKey},
};
use crate::{
    arithmetic::{mul_secret, AffinePoint, ProjectivePoint},
    context::Context,
    encoding::sec1,
    error::Error,
    tools::serde::{self as serde_bytes, TryFromBytes},
};

/// A public key: a curve point other than the point at infinity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(AffinePoint);

impl PublicKey {
    /// Derives the public key of a secret key using a constant-time generator multiplication.
    pub fn from_secret_key(ctx: &Context, secret_key: &SecretKey) -> Self {
        // The secret scalar is non-zero and the group order is prime, so this is not the identity.
        Self(secret_key.as_secret().mul_by_generator(ctx).to_affine())
    }

    /// Parses a SEC1 encoding: 33 bytes compressed (`0x02`/`0x03`) or 65 bytes uncompressed (`0x04`).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        sec1::decode_point(bytes).map(Self)
    }

    /// Returns the 33-byte compressed SEC1 encoding.
    pub fn to_compressed_bytes(&self) -> [u8; 33] {
        sec1::encode_compressed(&self.0)
    }

    /// Returns the 65-byte uncompressed SEC1 encoding.
    pub fn to_uncompressed_bytes(&self) -> [u8; 65] {
        sec1::encode_uncompressed(&self.0)
    }

    /// Returns the x-only public key and the parity of the y coordinate.
    pub fn x_only_public_key(&self) -> (XOnlyPublicKey, Parity) {
        XOnlyPublicKey::from_public_key(self)
    }

    /// Returns `-P`.
    pub fn negate(&self) -> Self {
        Self(self.0.negate())
    }

    /// Returns `P + t * G`.
    ///
    /// Fails if the tweak is not below the group order or the result is the point at infinity.
    pub fn add_exp_tweak(&self, ctx: &Context, tweak: &[u8; 32]) -> Result<Self, Error> {
        let tweak = parse_tweak(tweak)?;
        let point = ctx.mul_generator(&tweak).add_mixed(&self.0);
        Self::from_projective(&point).map_err(|_| Error::InvalidTweak)
    }

    /// Returns `t * P`.
    ///
    /// Fails if the tweak is zero or not below the group order.
    pub fn mul_tweak(&self, tweak: &[u8; 32]) -> Result<Self, Error> {
        let tweak = parse_tweak(tweak)?;
        if bool::from(tweak.is_zero()) {
            return Err(Error::InvalidTweak);
        }
        Ok(Self(mul_secret(&self.0.to_projective(), &tweak).to_affine()))
    }

    /// Adds public keys together.
    ///
    /// Fails if `keys` is empty or the sum is the point at infinity.
    pub fn combine(keys: &[&PublicKey]) -> Result<Self, Error> {
        if keys.is_empty() {
            return Err(Error::InvalidPublicKey);
        }
        let sum = keys
            .iter()
            .fold(ProjectivePoint::IDENTITY, |acc, key| acc.add_mixed(&key.0));
        Self::from_projective(&sum)
    }

    pub(crate) fn from_affine(point: AffinePoint) -> Result<Self, Error> {
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidPublicKey);
        }
        Ok(Self(point))
    }

    pub(crate) fn from_projective(point: &ProjectivePoint) -> Result<Self, Error> {
        Self::from_affine(point.to_affine())
    }

    pub(crate) fn as_affine(&self) -> &AffinePoint {
        &self.0
    }

    pub(crate) fn to_projective(self) -> ProjectivePoint {
        self.0.to_projective()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_compressed_bytes()))
    }
}

impl TryFromBytes for PublicKey {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_bytes::serialize(&self.to_compressed_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    use rand_core::OsRng;

    use super::PublicKey;
    use crate::{arithmetic::Scalar, context::Context, error::Error, keys::SecretKey};

    #[test]
    fn matches_k256() {
        let ctx = Context::new();
        for _ in 0..8 {
            let sk = SecretKey::random(&mut OsRng).unwrap();
            let pk = sk.public_key(&ctx);

            let k256_sk = k256::SecretKey::from_slice(&*sk.to_bytes()).unwrap();
            let k256_pk = k256_sk.public_key();
            assert_eq!(
                pk.to_compressed_bytes().as_slice(),
                k256_pk.to_encoded_point(true).as_bytes()
            );
            assert_eq!(
                pk.to_uncompressed_bytes().as_slice(),
                k256_pk.to_encoded_point(false).as_bytes()
            );
        }
    }

    #[test]
    fn encodings_round_trip() {
        let ctx = Context::new();
        let pk = SecretKey::random(&mut OsRng).unwrap().public_key(&ctx);
        assert_eq!(PublicKey::from_bytes(&pk.to_compressed_bytes()).unwrap(), pk);
        assert_eq!(PublicKey::from_bytes(&pk.to_uncompressed_bytes()).unwrap(), pk);

        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), pk);
    }

    #[test]
    fn tweaks_commute_with_secret_tweaks() {
        let ctx = Context::new();
        let sk = SecretKey::random(&mut OsRng).unwrap();
        let pk = sk.public_key(&ctx);
        let tweak = Scalar::random(&mut OsRng).to_bytes();

        assert_eq!(
            pk.add_exp_tweak(&ctx, &tweak).unwrap(),
            sk.add_tweak(&tweak).unwrap().public_key(&ctx)
        );
        assert_eq!(
            pk.mul_tweak(&tweak).unwrap(),
            sk.mul_tweak(&tweak).unwrap().public_key(&ctx)
        );
        assert_eq!(pk.negate(), sk.negate().public_key(&ctx));

        // P + (n - d) G is the point at infinity
        assert_eq!(
            pk.add_exp_tweak(&ctx, &sk.negate().to_bytes()).unwrap_err(),
            Error::InvalidTweak
        );
        assert_eq!(pk.mul_tweak(&[0u8; 32]).unwrap_err(), Error::InvalidTweak);
    }

    #[test]
    fn combination() {
        let ctx = Context::new();
        let a = SecretKey::random(&mut OsRng).unwrap();
        let b = SecretKey::random(&mut OsRng).unwrap();
        let (pa, pb) = (a.public_key(&ctx), b.public_key(&ctx));

        let sum = PublicKey::combine(&[&pa, &pb]).unwrap();
        assert_eq!(sum, a.add_tweak(&b.to_bytes()).unwrap().public_key(&ctx));
        assert_eq!(PublicKey::combine(&[&pa]).unwrap(), pa);
        assert_eq!(PublicKey::combine(&[&pa, &pa.negate()]).unwrap_err(), Error::InvalidPublicKey);
        assert_eq!(PublicKey::combine(&[]).unwrap_err(), Error::InvalidPublicKey);
    }
}
