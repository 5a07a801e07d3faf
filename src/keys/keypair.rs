use rand_core::CryptoRngCore;

use super::{
    public::PublicKey,
    secret::SecretKey,
    xonly::{Parity, XOnlyPublicKey},
};
use crate::{context::Context, error::Error};

/// A secret key together with its cached public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Creates a keypair, deriving the public key with one generator multiplication.
    pub fn from_secret_key(ctx: &Context, secret_key: &SecretKey) -> Self {
        Self {
            secret_key: secret_key.clone(),
            public_key: secret_key.public_key(ctx),
        }
    }

    /// Parses a 32-byte secret key and derives its public key.
    pub fn from_secret_bytes(ctx: &Context, bytes: &[u8; 32]) -> Result<Self, Error> {
        Ok(Self::from_secret_key(ctx, &SecretKey::from_bytes(bytes)?))
    }

    /// Generates a random keypair.
    pub fn random(ctx: &Context, rng: &mut impl CryptoRngCore) -> Result<Self, Error> {
        Ok(Self::from_secret_key(ctx, &SecretKey::random(rng)?))
    }

    /// Returns the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Returns the public key.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Returns the x-only public key and the parity of the full public key.
    pub fn x_only_public_key(&self) -> (XOnlyPublicKey, Parity) {
        self.public_key.x_only_public_key()
    }

    /// Applies a BIP-341 style tweak: the secret key is first negated if the public key has odd y,
    /// then `t` is added. The public key of the result matches [`XOnlyPublicKey::add_tweak`].
    pub fn add_xonly_tweak(&self, ctx: &Context, tweak: &[u8; 32]) -> Result<Self, Error> {
        let secret_key = self.even_secret_key().add_tweak(tweak)?;
        Ok(Self::from_secret_key(ctx, &secret_key))
    }

    /// Returns the secret key negated if needed so that its public key has an even y coordinate.
    pub(crate) fn even_secret_key(&self) -> SecretKey {
        let (_, parity) = self.x_only_public_key();
        self.secret_key.conditional_negate(parity.to_u8().into())
    }
}
