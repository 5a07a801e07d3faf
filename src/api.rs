//! Byte-buffer entry points over the process-wide [`Context`].
//!
//! Every function parses its inputs, runs one operation and serializes the result,
//! so callers never handle the typed API. Secret outputs are returned in [`Zeroizing`] buffers.

use alloc::vec::Vec;

use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::{
    context::Context,
    ecdh::SharedSecret,
    ecdsa::{self, RecoverableSignature, Signature},
    error::Error,
    keys::{Keypair, PublicKey, SecretKey, XOnlyPublicKey},
    schnorr::{self, SchnorrSignature},
};

/// Generates a key pair from the operating system's random source.
///
/// Returns the 32-byte secret key and the 33-byte compressed public key.
pub fn generate_keypair() -> Result<(Zeroizing<[u8; 32]>, [u8; 33]), Error> {
    let secret_key = SecretKey::random(&mut OsRng)?;
    let public_key = secret_key.public_key(Context::global());
    Ok((secret_key.to_bytes(), public_key.to_compressed_bytes()))
}

/// Returns the compressed public key of a 32-byte secret key.
pub fn public_key_create(secret_key: &[u8; 32]) -> Result<[u8; 33], Error> {
    let secret_key = SecretKey::from_bytes(secret_key)?;
    Ok(secret_key.public_key(Context::global()).to_compressed_bytes())
}

/// Signs a 32-byte message hash, returning the 64-byte compact signature.
pub fn sign_ecdsa(message: &[u8; 32], secret_key: &[u8; 32]) -> Result<[u8; 64], Error> {
    let secret_key = SecretKey::from_bytes(secret_key)?;
    Ok(ecdsa::sign(Context::global(), message, &secret_key).to_compact())
}

/// Verifies a compact signature against a SEC1-encoded public key.
///
/// Malformed inputs are errors; a well-formed signature that does not verify gives `Ok(false)`.
pub fn verify_ecdsa(message: &[u8; 32], signature: &[u8; 64], public_key: &[u8]) -> Result<bool, Error> {
    let signature = Signature::from_compact(signature)?;
    let public_key = PublicKey::from_bytes(public_key)?;
    Ok(ecdsa::verify(Context::global(), message, &signature, &public_key))
}

/// Signs a 32-byte message hash, returning `r || s || recovery_id`.
pub fn sign_ecdsa_recoverable(message: &[u8; 32], secret_key: &[u8; 32]) -> Result<[u8; 65], Error> {
    let secret_key = SecretKey::from_bytes(secret_key)?;
    Ok(ecdsa::sign_recoverable(Context::global(), message, &secret_key).to_bytes())
}

/// Recovers the compressed public key from a 65-byte recoverable signature.
pub fn recover_pubkey(message: &[u8; 32], signature: &[u8; 65]) -> Result<[u8; 33], Error> {
    let signature = RecoverableSignature::from_bytes(signature)?;
    Ok(ecdsa::recover(Context::global(), message, &signature)?.to_compressed_bytes())
}

/// Creates a BIP-340 signature over a message of any length.
pub fn sign_schnorr(message: &[u8], secret_key: &[u8; 32], aux: &[u8; 32]) -> Result<[u8; 64], Error> {
    let ctx = Context::global();
    let keypair = Keypair::from_secret_bytes(ctx, secret_key)?;
    Ok(schnorr::sign(ctx, message, &keypair, aux)?.to_bytes())
}

/// Verifies a BIP-340 signature against a 32-byte x-only public key.
pub fn verify_schnorr(message: &[u8], signature: &[u8; 64], public_key: &[u8; 32]) -> Result<bool, Error> {
    let public_key = XOnlyPublicKey::from_bytes(public_key)?;
    let signature = SchnorrSignature::from_bytes(signature);
    Ok(schnorr::verify(Context::global(), message, &signature, &public_key))
}

/// Derives the 32-byte ECDH shared secret with a SEC1-encoded peer public key.
pub fn ecdh(secret_key: &[u8; 32], public_key: &[u8]) -> Result<Zeroizing<[u8; 32]>, Error> {
    let secret_key = SecretKey::from_bytes(secret_key)?;
    let public_key = PublicKey::from_bytes(public_key)?;
    let shared = SharedSecret::new(&public_key, &secret_key);
    Ok(Zeroizing::new(*shared.as_bytes()))
}

/// Re-encodes any valid SEC1 public key in compressed form.
pub fn pubkey_compress(public_key: &[u8]) -> Result<[u8; 33], Error> {
    Ok(PublicKey::from_bytes(public_key)?.to_compressed_bytes())
}

/// Re-encodes any valid SEC1 public key in uncompressed form.
pub fn pubkey_uncompress(public_key: &[u8]) -> Result<[u8; 65], Error> {
    Ok(PublicKey::from_bytes(public_key)?.to_uncompressed_bytes())
}

/// Converts a compact signature to DER.
pub fn signature_to_der(signature: &[u8; 64]) -> Result<Vec<u8>, Error> {
    Ok(Signature::from_compact(signature)?.to_der())
}

/// Converts a strict DER signature to compact form.
pub fn signature_from_der(der: &[u8]) -> Result<[u8; 64], Error> {
    Ok(Signature::from_der(der)?.to_compact())
}
