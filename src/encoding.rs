//! Wire encodings for keys and signatures.

pub(crate) mod der;
pub(crate) mod sec1;
