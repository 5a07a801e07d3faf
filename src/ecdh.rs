//! Elliptic-curve Diffie-Hellman key agreement.

use core::fmt;

use crypto_bigint::subtle::{Choice, ConstantTimeEq};
use digest::Digest;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::keys::{PublicKey, SecretKey};

/// A 32-byte shared secret, zeroized on drop.
#[derive(Clone)]
pub struct SharedSecret(Zeroizing<[u8; 32]>);

impl SharedSecret {
    /// Computes `SHA256(0x02 | parity(y) || x)` of the shared point `d * P`.
    ///
    /// Both parties get the same value, since `d_a * (d_b * G) = d_b * (d_a * G)`.
    pub fn new(peer: &PublicKey, secret_key: &SecretKey) -> Self {
        Self::with_hasher(peer, secret_key, |x, y| {
            let prefix = [0x02 | (y[31] & 1)];
            Sha256::new().chain_update(prefix).chain_update(x).finalize().into()
        })
    }

    /// Computes the shared point `d * P` in constant time
    /// and hashes its coordinates (32-byte big-endian `x` and `y`) with `hasher`.
    pub fn with_hasher(
        peer: &PublicKey,
        secret_key: &SecretKey,
        hasher: impl FnOnce(&[u8; 32], &[u8; 32]) -> [u8; 32],
    ) -> Self {
        let shared = Zeroizing::new(&peer.to_projective() * secret_key.as_secret());
        let shared = Zeroizing::new(shared.to_affine());
        let x = Zeroizing::new(shared.x().to_bytes());
        let y = Zeroizing::new(shared.y().to_bytes());
        Self(Zeroizing::new(hasher(&x, &y)))
    }

    /// Returns the secret bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(...)")
    }
}

#[cfg(test)]
mod tests {
    use digest::Digest;
    use rand_core::OsRng;
    use sha2::Sha256;

    use super::SharedSecret;
    use crate::{context::Context, keys::SecretKey};

    #[test]
    fn agreement_is_symmetric() {
        let ctx = Context::new();
        let alice = SecretKey::random(&mut OsRng).unwrap();
        let bob = SecretKey::random(&mut OsRng).unwrap();

        let ab = SharedSecret::new(&bob.public_key(&ctx), &alice);
        let ba = SharedSecret::new(&alice.public_key(&ctx), &bob);
        assert_eq!(ab, ba);

        let carol = SecretKey::random(&mut OsRng).unwrap();
        assert_ne!(SharedSecret::new(&carol.public_key(&ctx), &alice), ab);
    }

    #[test]
    fn default_hash_is_sha256_of_compressed_point() {
        let ctx = Context::new();
        let alice = SecretKey::random(&mut OsRng).unwrap();
        let bob = SecretKey::random(&mut OsRng).unwrap();

        let shared_point = bob.public_key(&ctx).mul_tweak(&alice.to_bytes()).unwrap();
        let expected: [u8; 32] = Sha256::digest(shared_point.to_compressed_bytes()).into();
        assert_eq!(SharedSecret::new(&bob.public_key(&ctx), &alice).as_bytes(), &expected);
    }

    #[test]
    fn custom_hasher_sees_coordinates() {
        let ctx = Context::new();
        let alice = SecretKey::random(&mut OsRng).unwrap();
        let bob = SecretKey::random(&mut OsRng).unwrap();

        let shared_point = bob.public_key(&ctx).mul_tweak(&alice.to_bytes()).unwrap();
        let uncompressed = shared_point.to_uncompressed_bytes();

        let x_only = SharedSecret::with_hasher(&bob.public_key(&ctx), &alice, |x, _y| *x);
        assert_eq!(x_only.as_bytes().as_slice(), &uncompressed[1..33]);
        let y_only = SharedSecret::with_hasher(&bob.public_key(&ctx), &alice, |_x, y| *y);
        assert_eq!(y_only.as_bytes().as_slice(), &uncompressed[33..]);
    }

    #[test]
    fn equality_is_constant_time() {
        use crypto_bigint::subtle::ConstantTimeEq;

        let ctx = Context::new();
        let alice = SecretKey::random(&mut OsRng).unwrap();
        let bob = SecretKey::random(&mut OsRng).unwrap();
        let ab = SharedSecret::new(&bob.public_key(&ctx), &alice);
        let ba = SharedSecret::new(&alice.public_key(&ctx), &bob);
        let aa = SharedSecret::new(&alice.public_key(&ctx), &alice);

        assert!(bool::from(ab.ct_eq(&ba)));
        assert!(!bool::from(ab.ct_eq(&aa)));
        assert_eq!(ab, ba);
        assert_ne!(ab, aa);
    }

    #[test]
    fn debug_output_hides_value() {
        let ctx = Context::new();
        let alice = SecretKey::random(&mut OsRng).unwrap();
        let secret = SharedSecret::new(&alice.public_key(&ctx), &alice);
        assert_eq!(format!("{secret:?}"), "SharedSecret(...)");
    }
}
