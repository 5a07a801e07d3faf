use js_sys::{Error, Uint8Array};
use secp256k1_ct::{api, Error as EngineError};
use wasm_bindgen::prelude::wasm_bindgen;
use zeroize::Zeroizing;

fn to_js_error(err: EngineError) -> Error {
    Error::new(&format!("{}", err))
}

fn fixed<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], Error> {
    bytes
        .try_into()
        .map_err(|_| Error::new(&format!("{what} must be {N} bytes long, got {}", bytes.len())))
}

/// A freshly generated key pair
#[wasm_bindgen]
pub struct KeyPair {
    secret_key: Zeroizing<Vec<u8>>,
    public_key: Vec<u8>,
}

#[wasm_bindgen]
impl KeyPair {
    /// The 32-byte secret key
    #[wasm_bindgen(getter, js_name = secretKey)]
    pub fn secret_key(&self) -> Uint8Array {
        Uint8Array::from(self.secret_key.as_slice())
    }

    /// The 33-byte compressed public key
    #[wasm_bindgen(getter, js_name = publicKey)]
    pub fn public_key(&self) -> Uint8Array {
        Uint8Array::from(self.public_key.as_slice())
    }
}

/// Generate a key pair using the platform's random source
#[wasm_bindgen(js_name = generateKeypair)]
pub fn generate_keypair() -> Result<KeyPair, Error> {
    let (secret_key, public_key) = api::generate_keypair().map_err(to_js_error)?;
    Ok(KeyPair {
        secret_key: Zeroizing::new(secret_key.to_vec()),
        public_key: public_key.to_vec(),
    })
}

/// Sign a 32-byte message hash with ECDSA, returning the 64-byte compact signature
#[wasm_bindgen(js_name = signEcdsa)]
pub fn sign_ecdsa(message: &[u8], secret_key: &[u8]) -> Result<Uint8Array, Error> {
    let signature = api::sign_ecdsa(&fixed(message, "message hash")?, &fixed(secret_key, "secret key")?)
        .map_err(to_js_error)?;
    Ok(Uint8Array::from(signature.as_slice()))
}

/// Verify a compact ECDSA signature against a SEC1-encoded public key
#[wasm_bindgen(js_name = verifyEcdsa)]
pub fn verify_ecdsa(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, Error> {
    api::verify_ecdsa(
        &fixed(message, "message hash")?,
        &fixed(signature, "signature")?,
        public_key,
    )
    .map_err(to_js_error)
}

/// Sign a 32-byte message hash with ECDSA, returning `r || s || recovery_id`
#[wasm_bindgen(js_name = signEcdsaRecoverable)]
pub fn sign_ecdsa_recoverable(message: &[u8], secret_key: &[u8]) -> Result<Uint8Array, Error> {
    let signature = api::sign_ecdsa_recoverable(&fixed(message, "message hash")?, &fixed(secret_key, "secret key")?)
        .map_err(to_js_error)?;
    Ok(Uint8Array::from(signature.as_slice()))
}

/// Recover the compressed public key from a 65-byte recoverable signature
#[wasm_bindgen(js_name = recoverPubkey)]
pub fn recover_pubkey(message: &[u8], signature: &[u8]) -> Result<Uint8Array, Error> {
    let public_key = api::recover_pubkey(&fixed(message, "message hash")?, &fixed(signature, "signature")?)
        .map_err(to_js_error)?;
    Ok(Uint8Array::from(public_key.as_slice()))
}

/// Create a BIP-340 Schnorr signature over a message of any length
#[wasm_bindgen(js_name = signSchnorr)]
pub fn sign_schnorr(message: &[u8], secret_key: &[u8], aux: &[u8]) -> Result<Uint8Array, Error> {
    let signature = api::sign_schnorr(
        message,
        &fixed(secret_key, "secret key")?,
        &fixed(aux, "auxiliary randomness")?,
    )
    .map_err(to_js_error)?;
    Ok(Uint8Array::from(signature.as_slice()))
}

/// Verify a BIP-340 Schnorr signature against a 32-byte x-only public key
#[wasm_bindgen(js_name = verifySchnorr)]
pub fn verify_schnorr(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, Error> {
    api::verify_schnorr(
        message,
        &fixed(signature, "signature")?,
        &fixed(public_key, "x-only public key")?,
    )
    .map_err(to_js_error)
}

/// Derive the 32-byte ECDH shared secret
#[wasm_bindgen]
pub fn ecdh(secret_key: &[u8], public_key: &[u8]) -> Result<Uint8Array, Error> {
    let shared = api::ecdh(&fixed(secret_key, "secret key")?, public_key).map_err(to_js_error)?;
    Ok(Uint8Array::from(shared.as_slice()))
}

/// Re-encode a SEC1 public key in compressed form
#[wasm_bindgen(js_name = pubkeyCompress)]
pub fn pubkey_compress(public_key: &[u8]) -> Result<Uint8Array, Error> {
    let compressed = api::pubkey_compress(public_key).map_err(to_js_error)?;
    Ok(Uint8Array::from(compressed.as_slice()))
}

/// Re-encode a SEC1 public key in uncompressed form
#[wasm_bindgen(js_name = pubkeyUncompress)]
pub fn pubkey_uncompress(public_key: &[u8]) -> Result<Uint8Array, Error> {
    let uncompressed = api::pubkey_uncompress(public_key).map_err(to_js_error)?;
    Ok(Uint8Array::from(uncompressed.as_slice()))
}

/// Convert a compact ECDSA signature to DER
#[wasm_bindgen(js_name = signatureToDer)]
pub fn signature_to_der(signature: &[u8]) -> Result<Uint8Array, Error> {
    let der = api::signature_to_der(&fixed(signature, "signature")?).map_err(to_js_error)?;
    Ok(Uint8Array::from(der.as_slice()))
}

/// Convert a strict DER ECDSA signature to compact form
#[wasm_bindgen(js_name = signatureFromDer)]
pub fn signature_from_der(der: &[u8]) -> Result<Uint8Array, Error> {
    let compact = api::signature_from_der(der).map_err(to_js_error)?;
    Ok(Uint8Array::from(compact.as_slice()))
}
