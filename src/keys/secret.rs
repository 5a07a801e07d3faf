use core::fmt;

use crypto_bigint::subtle::{Choice, ConstantTimeEq, CtOption};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use super::public::PublicKey;
use crate::{
    arithmetic::Scalar,
    context::Context,
    error::Error,
    tools::{
        serde::{self as serde_bytes, TryFromBytes},
        Secret,
    },
};

/// How many candidates [`SecretKey::random`] draws before giving up.
///
/// A uniformly random 32-byte string is rejected with probability below `2^-127`,
/// so reaching this bound means the random source is broken.
pub const KEYGEN_MAX_ATTEMPTS: usize = 128;

/// A secret key: a scalar in `[1, n)`.
///
/// The scalar lives in a heap allocation that is zeroized on drop.
#[derive(Clone)]
pub struct SecretKey(Secret<Scalar>);

impl SecretKey {
    /// Generates a uniformly random secret key.
    ///
    /// Fails with [`Error::EntropyFailure`] if the random source reports an error
    /// or keeps producing out-of-range values.
    pub fn random(rng: &mut impl CryptoRngCore) -> Result<Self, Error> {
        for attempt in 0..KEYGEN_MAX_ATTEMPTS {
            let mut bytes = Zeroizing::new([0u8; 32]);
            rng.try_fill_bytes(&mut *bytes).map_err(|err| {
                tracing::warn!("Random source failed during key generation: {err}");
                Error::EntropyFailure
            })?;
            match Self::from_bytes(&bytes) {
                Ok(key) => return Ok(key),
                Err(_) => tracing::trace!("Rejected out-of-range key candidate #{attempt}"),
            }
        }
        tracing::warn!("Key generation gave up after {KEYGEN_MAX_ATTEMPTS} attempts");
        Err(Error::EntropyFailure)
    }

    /// Decodes a 32-byte big-endian scalar, rejecting zero and values not below the group order.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        let scalar = Secret::try_init_with(|| {
            let nonzero = Scalar::from_bytes(bytes).and_then(|s| CtOption::new(s, !s.is_zero()));
            Option::<Scalar>::from(nonzero).ok_or(Error::InvalidSecretKey)
        })?;
        Ok(Self(scalar))
    }

    /// Same as [`SecretKey::from_bytes`], for a slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidSecretKey)?;
        Self::from_bytes(bytes)
    }

    /// Returns the 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.expose_secret().to_bytes())
    }

    /// Derives the public key `d * G`.
    pub fn public_key(&self, ctx: &Context) -> PublicKey {
        PublicKey::from_secret_key(ctx, self)
    }

    /// Returns `n - d`.
    pub fn negate(&self) -> Self {
        Self(-&self.0)
    }

    /// Returns `d + t mod n`.
    ///
    /// Fails if the tweak is not below the group order or the result is zero.
    pub fn add_tweak(&self, tweak: &[u8; 32]) -> Result<Self, Error> {
        let tweak = parse_tweak(tweak)?;
        let sum = &self.0 + &tweak;
        if bool::from(sum.expose_secret().is_zero()) {
            return Err(Error::InvalidTweak);
        }
        Ok(Self(sum))
    }

    /// Returns `d * t mod n`.
    ///
    /// Fails if the tweak is zero or not below the group order.
    pub fn mul_tweak(&self, tweak: &[u8; 32]) -> Result<Self, Error> {
        let tweak = parse_tweak(tweak)?;
        if bool::from(tweak.is_zero()) {
            return Err(Error::InvalidTweak);
        }
        Ok(Self(&self.0 * &tweak))
    }

    /// Negates the key if `choice` is set, in constant time.
    pub(crate) fn conditional_negate(&self, choice: Choice) -> Self {
        Self(Secret::conditional_select(&self.0, &-&self.0, choice))
    }

    pub(crate) fn as_secret(&self) -> &Secret<Scalar> {
        &self.0
    }
}

/// Tweaks are public values; they are never reduced, out-of-range values are an error.
pub(crate) fn parse_tweak(tweak: &[u8; 32]) -> Result<Scalar, Error> {
    Option::from(Scalar::from_bytes(tweak)).ok_or(Error::InvalidTweak)
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.expose_secret().ct_eq(other.0.expose_secret())
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(...)")
    }
}

impl TryFromBytes for SecretKey {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Serialize for SecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = self.to_bytes();
        serde_bytes::serialize(&*bytes, serializer)
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}
