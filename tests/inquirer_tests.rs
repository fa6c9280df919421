//! Inquiring certifier tests: bridging validator rotations through an
//! untrusted seed provider, including the divide-and-conquer search.

use lightbft::certifiers::helper::ValKeys;
use lightbft::certifiers::{CacheProvider, InquiringCertifier, MemProvider, Provider};
use lightbft::types::Hash;
use lightbft::Error;

const CHAIN: &str = "test-chain-inq";

fn app_hash(h: u64) -> Hash {
    let mut b = [0u8; 32];
    b[..8].copy_from_slice(&h.to_be_bytes());
    Hash(b)
}

/// Seeds at every height in 1..=n, each consecutive pair differing by one
/// validator swap, every checkpoint fully signed by the previous set.
/// Returns (genesis keys, final keys, provider).
fn rotation_chain(n: u64) -> (ValKeys, ValKeys, MemProvider) {
    let provider = MemProvider::new();
    let start = ValKeys::generate(5);
    let mut keys = start.clone();

    for h in 1..=n {
        let signers = keys.clone();
        keys = keys.change((h % 5) as usize);
        let vals = keys.to_validators(1, 0);
        // header at h names the rotated set; the previous set signs it
        let seed = signers.gen_seed(CHAIN, h, app_hash(h), &vals, 0, 5);
        provider.store_seed(&seed).unwrap();
    }
    (start, keys, provider)
}

#[test]
fn test_certify_follows_single_rotation() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let provider = MemProvider::new();

    let keys2 = keys.change(1);
    let vals2 = keys2.to_validators(1, 0);
    provider
        .store_seed(&keys.gen_seed(CHAIN, 2, app_hash(2), &vals2, 0, 4))
        .unwrap();

    let cert = InquiringCertifier::new(CHAIN, vals, provider);
    // checkpoint at height 3 is signed by the rotated set
    let check = keys2.gen_checkpoint(CHAIN, 3, app_hash(3), &vals2, 0, 4);
    cert.certify(&check).unwrap();
    assert_eq!(cert.last_height(), 3);
    assert_eq!(cert.trusted_hash(), vals2.hash());
}

#[test]
fn test_search_crosses_long_rotation_chain() {
    let n = 32;
    let (start_keys, final_keys, provider) = rotation_chain(n);
    let final_vals = final_keys.to_validators(1, 0);

    let cert = InquiringCertifier::new(CHAIN, start_keys.to_validators(1, 0), provider);
    let check = final_keys.gen_checkpoint(CHAIN, n + 1, app_hash(n + 1), &final_vals, 0, 5);
    cert.certify(&check).unwrap();
    assert_eq!(cert.last_height(), n + 1);
    assert_eq!(cert.trusted_hash(), final_vals.hash());
}

#[test]
fn test_disjoint_sets_find_no_path() {
    // provider holds only a seed whose validator set shares nothing with the
    // trusted one; no chain of supermajority-endorsed steps can exist
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let provider = MemProvider::new();

    let strangers = ValKeys::generate(4);
    let stranger_vals = strangers.to_validators(1, 0);
    provider
        .store_seed(&strangers.gen_seed(CHAIN, 50, app_hash(50), &stranger_vals, 0, 4))
        .unwrap();
    // the trusted point itself is also available, as it would be in practice
    provider
        .store_seed(&keys.gen_seed(CHAIN, 1, app_hash(1), &vals, 0, 4))
        .unwrap();

    let cert = InquiringCertifier::new(CHAIN, vals.clone(), provider);
    let check = keys.gen_checkpoint(CHAIN, 1, app_hash(1), &vals, 0, 4);
    cert.certify(&check).unwrap();
    assert_eq!(cert.last_height(), 1);

    let check = strangers.gen_checkpoint(CHAIN, 51, app_hash(51), &stranger_vals, 0, 4);
    match cert.certify(&check) {
        Err(Error::NoPathFound) | Err(Error::TooMuchChange) => {}
        other => panic!("disjoint rotation must never certify, got {:?}", other),
    }
    assert_eq!(cert.trusted_hash(), vals.hash(), "trust must be untouched");
}

#[test]
fn test_unknown_hash_propagates_not_found() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let cert = InquiringCertifier::new(CHAIN, vals, MemProvider::new());

    let keys2 = keys.change(0);
    let vals2 = keys2.to_validators(1, 0);
    let check = keys2.gen_checkpoint(CHAIN, 2, app_hash(2), &vals2, 0, 4);

    match cert.certify(&check) {
        Err(Error::SeedNotFound) => {}
        other => panic!("empty provider must surface SeedNotFound, got {:?}", other),
    }
}

#[test]
fn test_non_rotation_failures_are_not_retried() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let cert = InquiringCertifier::new(CHAIN, vals.clone(), MemProvider::new());

    // same trusted set, merely undersigned: a hard TooMuchChange, no search
    let check = keys.gen_checkpoint(CHAIN, 2, app_hash(2), &vals, 0, 2);
    match cert.certify(&check) {
        Err(Error::TooMuchChange) => {}
        other => panic!("expected TooMuchChange, got {:?}", other),
    }
}

#[test]
fn test_successful_updates_populate_the_cache_layer() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);

    // seed lives only in the slow source; the cache layer starts empty
    let source = MemProvider::new();
    let keys2 = keys.change(1);
    let vals2 = keys2.to_validators(1, 0);
    source
        .store_seed(&keys.gen_seed(CHAIN, 2, app_hash(2), &vals2, 0, 4))
        .unwrap();
    let provider = CacheProvider::new(MemProvider::new(), source);

    let cert = InquiringCertifier::new(CHAIN, vals, provider);
    let check = keys2.gen_checkpoint(CHAIN, 3, app_hash(3), &vals2, 0, 4);
    cert.certify(&check).unwrap();

    let cached = cert.provider().get_by_hash(&vals2.hash()).unwrap();
    assert_eq!(cached.height(), 2);
}
