use ed25519_dalek::Signer;
use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;

use crate::types::PublicKey;

pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let sk = SigningKey::generate(&mut OsRng);
    let vk = sk.verifying_key();
    (sk, vk)
}

pub fn sign(sk: &SigningKey, msg: &[u8]) -> [u8; 64] {
    let sig: Signature = sk.sign(msg);
    sig.to_bytes()
}

pub fn verify(vk: &VerifyingKey, msg: &[u8], sig_bytes: &[u8; 64]) -> bool {
    let sig = Signature::from_bytes(sig_bytes);
    vk.verify_strict(msg, &sig).is_ok()
}

/// Verify against raw key bytes. Keys that fail point decompression never
/// verify anything.
pub fn verify_raw(key: &PublicKey, msg: &[u8], sig_bytes: &[u8; 64]) -> bool {
    match VerifyingKey::from_bytes(&key.0) {
        Ok(vk) => verify(&vk, msg, sig_bytes),
        Err(_) => false,
    }
}
