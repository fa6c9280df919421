use crate::types::Hash;
use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> Hash {
    let out = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Hash(bytes)
}

/// Domain-separated hash of two child nodes, used by merkle branch proofs.
pub fn sha256_pair(left: &Hash, right: &Hash) -> Hash {
    let mut h = Sha256::new();
    h.update(b"node");
    h.update(left.0);
    h.update(right.0);
    let out = h.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Hash(bytes)
}
