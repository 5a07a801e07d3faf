//! Secret keys, public keys, x-only keys and keypairs.

mod keypair;
mod public;
mod secret;
mod xonly;

pub use keypair::Keypair;
pub use public::PublicKey;
pub use secret::{SecretKey, KEYGEN_MAX_ATTEMPTS};
pub use xonly::{Parity, XOnlyPublicKey};
