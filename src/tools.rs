pub(crate) mod hashing;
mod secret;
pub(crate) mod serde;

pub(crate) use secret::Secret;
