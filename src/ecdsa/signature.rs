use alloc::vec::Vec;
use core::fmt;

use crypto_bigint::subtle::CtOption;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    arithmetic::Scalar,
    encoding::der,
    error::Error,
    tools::serde::{self as serde_bytes, TryFromBytes},
};

/// An ECDSA signature `(r, s)` with both components in `[1, n)`.
///
/// Signatures produced by this crate are always low-s (`s <= n / 2`).
/// Parsed signatures may be high-s, which [`verify`](crate::ecdsa::verify) rejects;
/// use [`Signature::normalize_s`] to accept them deliberately.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

fn parse_component(bytes: &[u8; 32]) -> Result<Scalar, Error> {
    let scalar = Scalar::from_bytes(bytes).and_then(|s| CtOption::new(s, !s.is_zero()));
    Option::from(scalar).ok_or(Error::InvalidSignatureEncoding)
}

impl Signature {
    pub(crate) fn from_scalars(r: Scalar, s: Scalar) -> Self {
        Self { r, s }
    }

    /// Parses the 64-byte compact form `r || s`.
    pub fn from_compact(bytes: &[u8; 64]) -> Result<Self, Error> {
        let (r, s) = bytes.split_at(32);
        let r: &[u8; 32] = r.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        let s: &[u8; 32] = s.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        Ok(Self {
            r: parse_component(r)?,
            s: parse_component(s)?,
        })
    }

    /// Same as [`Signature::from_compact`], for a slice that must be exactly 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        Self::from_compact(bytes)
    }

    /// Returns the 64-byte compact form `r || s`.
    pub fn to_compact(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        let (r, s) = bytes.split_at_mut(32);
        r.copy_from_slice(&self.r.to_bytes());
        s.copy_from_slice(&self.s.to_bytes());
        bytes
    }

    /// Parses a strict DER encoding.
    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let (r, s) = der::decode_signature(bytes)?;
        Ok(Self {
            r: parse_component(&r)?,
            s: parse_component(&s)?,
        })
    }

    /// Returns the minimal DER encoding (at most 72 bytes).
    pub fn to_der(&self) -> Vec<u8> {
        der::encode_signature(&self.r.to_bytes(), &self.s.to_bytes())
    }

    /// Returns `true` if `s <= n / 2`.
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Returns the equivalent signature with `s` replaced by `n - s` if `s` is high.
    pub fn normalize_s(&self) -> Self {
        let mut normalized = *self;
        if !self.is_low_s() {
            normalized.s = -self.s;
        }
        normalized
    }

    pub(crate) fn r(&self) -> &Scalar {
        &self.r
    }

    pub(crate) fn s(&self) -> &Scalar {
        &self.s
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_compact()))
    }
}

impl TryFromBytes for Signature {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_bytes::serialize(&self.to_compact(), serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}
