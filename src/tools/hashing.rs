use digest::Digest;
use sha2::Sha256;

/// A SHA-256 based hasher with domain separation by tag, as defined in BIP-340:
/// `hash_tag(x) = SHA256(SHA256(tag) || SHA256(tag) || x)`.
#[derive(Debug, Clone)]
pub(crate) struct TaggedHasher(Sha256);

impl TaggedHasher {
    pub fn new_with_tag(tag: &[u8]) -> Self {
        let tag_hash = Sha256::digest(tag);
        let digest = Sha256::new().chain_update(tag_hash).chain_update(tag_hash);
        Self(digest)
    }

    pub fn chain_bytes(self, bytes: &(impl AsRef<[u8]> + ?Sized)) -> Self {
        Self(self.0.chain_update(bytes.as_ref()))
    }

    pub fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}

/// Computes the BIP-340 tagged hash of `msg`.
pub fn tagged_hash(tag: &[u8], msg: &[u8]) -> [u8; 32] {
    TaggedHasher::new_with_tag(tag).chain_bytes(msg).finalize()
}
