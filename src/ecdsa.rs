//! ECDSA over secp256k1 with deterministic (RFC 6979) nonces, low-s signatures
//! and public key recovery.
//!
//! Signing runs in constant time with respect to the secret key and the nonce.
//! Verification and recovery only touch public data and use variable-time multiplication.

mod nonce;
mod recovery;
mod signature;

use crypto_bigint::subtle::ConditionallySelectable;

pub use recovery::{recover, RecoverableSignature, RecoveryId};
pub use self::signature::Signature;

use crate::{arithmetic::Scalar, context::Context, keys::PublicKey, keys::SecretKey};
use nonce::NonceGenerator;

fn sign_inner(
    ctx: &Context,
    message: &[u8; 32],
    secret_key: &SecretKey,
    extra_entropy: Option<&[u8; 32]>,
) -> RecoverableSignature {
    let e = Scalar::reduce_bytes(message);
    let mut nonces = NonceGenerator::new(&secret_key.to_bytes(), &e.to_bytes(), extra_entropy);

    loop {
        let k = nonces.next_scalar();
        let big_r = k.mul_by_generator(ctx).to_affine();

        // `r` and the recovery bits are part of the signature, so branching on them is fine.
        let (r, x_reduced) = Scalar::from_field_element(&big_r.x());
        if bool::from(r.is_zero()) {
            tracing::trace!("ECDSA nonce produced r = 0, drawing another");
            continue;
        }

        // s = k^-1 (e + r d)
        let rd = secret_key.as_secret() * &r;
        let s = *(&k.invert() * (&rd + &e).expose_secret()).expose_secret();
        if bool::from(s.is_zero()) {
            tracing::trace!("ECDSA nonce produced s = 0, drawing another");
            continue;
        }

        let high = s.is_high();
        let s = Scalar::conditional_select(&s, &-s, high);
        let y_odd = big_r.y().is_odd() ^ high;

        return RecoverableSignature::new(
            Signature::from_scalars(r, s),
            RecoveryId::new(y_odd.into(), x_reduced.into()),
        );
    }
}

/// Signs a 32-byte message hash, returning a low-s signature.
///
/// The nonce is derived deterministically from the key and the message,
/// so the same inputs always give the same signature.
pub fn sign(ctx: &Context, message: &[u8; 32], secret_key: &SecretKey) -> Signature {
    sign_inner(ctx, message, secret_key, None).to_standard()
}

/// Same as [`sign`], but mixes 32 bytes of extra data into the nonce derivation.
///
/// The result is still deterministic for fixed `extra_entropy`;
/// passing fresh randomness hardens the nonce against fault attacks.
pub fn sign_with_entropy(
    ctx: &Context,
    message: &[u8; 32],
    secret_key: &SecretKey,
    extra_entropy: &[u8; 32],
) -> Signature {
    sign_inner(ctx, message, secret_key, Some(extra_entropy)).to_standard()
}

/// Signs a 32-byte message hash and returns the signature with its recovery id.
pub fn sign_recoverable(ctx: &Context, message: &[u8; 32], secret_key: &SecretKey) -> RecoverableSignature {
    sign_inner(ctx, message, secret_key, None)
}

/// Verifies a signature over a 32-byte message hash.
///
/// High-s signatures are rejected; normalize them with [`Signature::normalize_s`] first
/// if they should be accepted.
pub fn verify(ctx: &Context, message: &[u8; 32], signature: &Signature, public_key: &PublicKey) -> bool {
    if !signature.is_low_s() {
        tracing::debug!("Rejecting a high-s ECDSA signature");
        return false;
    }

    let e = Scalar::reduce_bytes(message);
    let s_inv = Option::<Scalar>::from(signature.s().invert()).expect("s is checked to be non-zero on parsing");
    let u1 = e * s_inv;
    let u2 = *signature.r() * s_inv;

    let big_r = ctx.mul_add_generator_vartime(&u2, &public_key.to_projective(), &u1);
    if bool::from(big_r.is_identity()) {
        return false;
    }
    let (x, _) = Scalar::from_field_element(&big_r.to_affine().x());
    &x == signature.r()
}

#[cfg(feature = "std")]
mod traits {
    use signature::{hazmat::PrehashSigner, hazmat::PrehashVerifier, Error};

    use super::Signature;
    use crate::{context::Context, keys::PublicKey, keys::SecretKey};

    fn message_hash(prehash: &[u8]) -> Result<&[u8; 32], Error> {
        prehash.try_into().map_err(|_| Error::new())
    }

    impl PrehashSigner<Signature> for SecretKey {
        fn sign_prehash(&self, prehash: &[u8]) -> Result<Signature, Error> {
            Ok(super::sign(Context::global(), message_hash(prehash)?, self))
        }
    }

    impl PrehashVerifier<Signature> for PublicKey {
        fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<(), Error> {
            if super::verify(Context::global(), message_hash(prehash)?, signature, self) {
                Ok(())
            } else {
                Err(Error::new())
            }
        }
    }
}
