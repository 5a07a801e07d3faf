/// Errors returned by key, signature and encoding operations.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The secret key is zero or not below the group order.
    InvalidSecretKey,
    /// The public key encoding is malformed or the point is not on the curve.
    InvalidPublicKey,
    /// The signature encoding is malformed or its components are out of range.
    InvalidSignatureEncoding,
    /// The tweak is not below the group order or produces an invalid key.
    InvalidTweak,
    /// The random number generator failed or did not produce a valid key in the allotted attempts.
    EntropyFailure,
    /// No public key could be recovered from the signature.
    RecoveryMismatch,
    /// The derived signing nonce is zero.
    InvalidNonce,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        tracing::debug!("Signature operation failed: {err}");
        signature::Error::new()
    }
}
