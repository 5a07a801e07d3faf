#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::indexing_slicing))]

/*!
## Features

`std` (default): [`Context::global`], the [`api`] module, and the [`signature`] trait implementations
(which use the global context).

`private-benches`: exposes internals for the benchmarks and the constant-time test harness.
*/

extern crate alloc;

mod arithmetic;
mod context;
pub mod ecdh;
pub mod ecdsa;
mod encoding;
mod error;
mod keys;
pub mod schnorr;
mod tools;

#[cfg(feature = "std")]
pub mod api;

// Re-exported to avoid the need for version-matching
pub use signature;

pub use context::Context;
pub use ecdh::SharedSecret;
pub use ecdsa::{RecoverableSignature, RecoveryId, Signature};
pub use error::Error;
pub use keys::{Keypair, Parity, PublicKey, SecretKey, XOnlyPublicKey, KEYGEN_MAX_ATTEMPTS};
pub use schnorr::SchnorrSignature;
pub use tools::hashing::tagged_hash;

#[cfg(feature = "private-benches")]
#[allow(missing_docs)]
#[doc(hidden)]
// Hack to expose internals for benchmarking purposes
pub mod private_benches;
