//! Serialization of byte-representable objects:
//! hex strings in human-readable formats, plain bytes otherwise.

use alloc::boxed::Box;
use core::fmt;

use serde::{de::Error as _, Deserializer, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};
use zeroize::Zeroizing;

/// A trait providing a way to construct an object from a byte slice.
pub(crate) trait TryFromBytes: Sized {
    /// The error returned on construction failure.
    type Error: fmt::Display;

    /// Attempts to construct an object from a byte slice.
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Serializes an object representable as bytes.
pub(crate) fn serialize<T, S>(obj: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]> + ?Sized,
    S: Serializer,
{
    SliceLike::<Hex>::serialize(&obj.as_ref(), serializer)
}

/// Deserializes an object representable as bytes.
///
/// The intermediate buffer is zeroized, since it may hold a secret key.
pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFromBytes,
{
    let bytes: Box<[u8]> = SliceLike::<Hex>::deserialize(deserializer)?;
    let bytes = Zeroizing::new(bytes);
    T::try_from_bytes(&bytes).map_err(D::Error::custom)
}
