use core::fmt;

use crypto_bigint::subtle::Choice;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::signature::Signature;
use crate::{
    arithmetic::{AffinePoint, FieldElement, Scalar},
    context::Context,
    error::Error,
    keys::PublicKey,
    tools::serde::{self as serde_bytes, TryFromBytes},
};

/// Identifies which of up to four candidate points was the signing nonce point `R`.
///
/// Bit 0 is the parity of `R.y`, bit 1 is set if `R.x` was not below the group order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    pub(crate) fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(u8::from(is_y_odd) | (u8::from(is_x_reduced) << 1))
    }

    /// Accepts the values `0..=3`.
    pub fn from_u8(value: u8) -> Result<Self, Error> {
        if value > 3 {
            return Err(Error::InvalidSignatureEncoding);
        }
        Ok(Self(value))
    }

    /// Returns the id as a value in `0..=3`.
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Whether `R.y` is odd.
    pub fn is_y_odd(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether `R.x` was reduced modulo `n` to obtain `r`.
    pub fn is_x_reduced(self) -> bool {
        self.0 & 2 == 2
    }
}

/// An ECDSA signature together with the [`RecoveryId`] needed to recover the signer's key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Attaches a recovery id to a signature.
    pub fn new(signature: Signature, recovery_id: RecoveryId) -> Self {
        Self {
            signature,
            recovery_id,
        }
    }

    /// Parses the 64-byte compact form and a separate recovery id.
    pub fn from_compact(bytes: &[u8; 64], recovery_id: RecoveryId) -> Result<Self, Error> {
        Ok(Self::new(Signature::from_compact(bytes)?, recovery_id))
    }

    /// Returns the 64-byte compact form and the recovery id.
    pub fn to_compact(&self) -> ([u8; 64], RecoveryId) {
        (self.signature.to_compact(), self.recovery_id)
    }

    /// Parses the 65-byte form `r || s || recovery_id`.
    pub fn from_bytes(bytes: &[u8; 65]) -> Result<Self, Error> {
        let (compact, recovery_id) = bytes.split_at(64);
        let compact: &[u8; 64] = compact.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        let recovery_id = recovery_id.first().copied().ok_or(Error::InvalidSignatureEncoding)?;
        Self::from_compact(compact, RecoveryId::from_u8(recovery_id)?)
    }

    /// Returns the 65-byte form `r || s || recovery_id`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        let (compact, recovery_id) = bytes.split_at_mut(64);
        compact.copy_from_slice(&self.signature.to_compact());
        recovery_id.fill(self.recovery_id.to_u8());
        bytes
    }

    /// Returns the recovery id.
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Drops the recovery id.
    pub fn to_standard(&self) -> Signature {
        self.signature
    }
}

/// Recovers the public key that produced `signature` over the 32-byte message hash.
///
/// Works on public data only and runs in variable time.
pub fn recover(ctx: &Context, message: &[u8; 32], signature: &RecoverableSignature) -> Result<PublicKey, Error> {
    let recovery_id = signature.recovery_id;
    let r = signature.signature.r();
    let s = signature.signature.s();

    let x = Option::<FieldElement>::from(r.to_field_element(Choice::from(u8::from(recovery_id.is_x_reduced()))))
        .ok_or(Error::RecoveryMismatch)?;
    let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(
        x,
        Choice::from(u8::from(recovery_id.is_y_odd())),
    ))
    .ok_or(Error::RecoveryMismatch)?;

    let r_inv = Option::<Scalar>::from(r.invert()).expect("r is checked to be non-zero on parsing");
    let e = Scalar::reduce_bytes(message);
    let u1 = -(e * r_inv);
    let u2 = *s * r_inv;

    // Q = r^-1 (s R - e G)
    let q = ctx.mul_add_generator_vartime(&u2, &big_r.to_projective(), &u1);
    PublicKey::from_projective(&q).map_err(|_| Error::RecoveryMismatch)
}

impl fmt::Display for RecoveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFromBytes for RecoverableSignature {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: &[u8; 65] = bytes.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        Self::from_bytes(bytes)
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_bytes::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}
