//! Deterministic nonces following RFC 6979, section 3.2, with HMAC-SHA256.

use crypto_bigint::subtle::CtOption;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{arithmetic::Scalar, tools::Secret};

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// The HMAC-DRBG state of RFC 6979.
///
/// Both state values are secret and are wiped on drop.
pub(crate) struct NonceGenerator {
    k: Zeroizing<[u8; 32]>,
    v: Zeroizing<[u8; 32]>,
    retry: bool,
}

impl NonceGenerator {
    /// Seeds the generator with the secret key, the message reduced modulo `n`,
    /// and optional extra data appended to the seed.
    pub fn new(secret_key: &[u8; 32], message: &[u8; 32], extra: Option<&[u8; 32]>) -> Self {
        let extra: &[u8] = extra.map_or(&[], |extra| extra.as_slice());
        let mut k = Zeroizing::new([0x00u8; 32]);
        let mut v = Zeroizing::new([0x01u8; 32]);

        *k = hmac(&k, &[v.as_slice(), &[0x00], secret_key, message, extra]);
        *v = hmac(&k, &[v.as_slice()]);
        *k = hmac(&k, &[v.as_slice(), &[0x01], secret_key, message, extra]);
        *v = hmac(&k, &[v.as_slice()]);

        Self { k, v, retry: false }
    }

    /// Returns the next candidate in `[1, n)`.
    ///
    /// Every call after the first advances the state first,
    /// so a caller that rejects a nonce gets a fresh one.
    pub fn next_scalar(&mut self) -> Secret<Scalar> {
        loop {
            if self.retry {
                *self.k = hmac(&self.k, &[self.v.as_slice(), &[0x00]]);
                *self.v = hmac(&self.k, &[self.v.as_slice()]);
            }
            self.retry = true;

            *self.v = hmac(&self.k, &[self.v.as_slice()]);
            let candidate = Secret::try_init_with(|| {
                let scalar = Scalar::from_bytes(&self.v).and_then(|s| CtOption::new(s, !s.is_zero()));
                Option::<Scalar>::from(scalar).ok_or(())
            });
            match candidate {
                Ok(nonce) => return nonce,
                Err(()) => tracing::trace!("RFC 6979 candidate out of range, drawing another"),
            }
        }
    }
}
