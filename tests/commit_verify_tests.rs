//! Commit verifier unit tests: threshold boundary, index binding, malformed
//! input handling.

use lightbft::certifiers::helper::ValKeys;
use lightbft::certifiers::{has_supermajority, verify_commit, StaticCertifier};
use lightbft::types::Hash;
use lightbft::Error;

const CHAIN: &str = "test-chain";

fn app_hash(seed: u8) -> Hash {
    Hash([seed; 32])
}

#[test]
fn test_supermajority_boundary() {
    // strictly greater than 2/3
    assert!(!has_supermajority(2, 3));
    assert!(has_supermajority(3, 4));
    assert!(!has_supermajority(66, 100));
    assert!(has_supermajority(67, 100));
    // widened math must not overflow near u64::MAX
    assert!(has_supermajority(u64::MAX, u64::MAX));
    assert!(!has_supermajority(u64::MAX / 3 * 2, u64::MAX));
}

#[test]
fn test_twenty_equal_validators_threshold() {
    // 20 validators of power 1 (total 20): 14 > 13.33 accepted, 13 rejected
    let keys = ValKeys::generate(20);
    let vals = keys.to_validators(1, 0);

    let check = keys.gen_checkpoint(CHAIN, 5, app_hash(1), &vals, 0, 14);
    assert!(verify_commit(CHAIN, &vals, &check).is_ok(), "14 of 20 must pass");

    let check = keys.gen_checkpoint(CHAIN, 5, app_hash(1), &vals, 0, 13);
    match verify_commit(CHAIN, &vals, &check) {
        Err(Error::TooMuchChange) => {}
        other => panic!("13 of 20 must be TooMuchChange, got {:?}", other),
    }
}

#[test]
fn test_weighted_threshold() {
    // powers 1..=4 (total 10): top validator alone (4) fails, top two (7) pass
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 1);
    assert_eq!(vals.total_power(), 10);

    let check = keys.gen_checkpoint(CHAIN, 2, app_hash(2), &vals, 3, 4);
    assert!(verify_commit(CHAIN, &vals, &check).is_err());

    let check = keys.gen_checkpoint(CHAIN, 2, app_hash(2), &vals, 2, 4);
    assert!(verify_commit(CHAIN, &vals, &check).is_ok());
}

#[test]
fn test_commit_length_mismatch_is_malformed() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let mut check = keys.gen_checkpoint(CHAIN, 1, app_hash(3), &vals, 0, 4);
    check.commit.votes.pop();

    match verify_commit(CHAIN, &vals, &check) {
        Err(Error::MalformedInput(_)) => {}
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_block_id_mismatch_is_malformed() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let mut check = keys.gen_checkpoint(CHAIN, 1, app_hash(3), &vals, 0, 4);
    check.commit.block_id.hash = Hash([0xAB; 32]);

    match verify_commit(CHAIN, &vals, &check) {
        Err(Error::MalformedInput(_)) => {}
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_index_binding_misplaced_vote_not_counted() {
    // all 4 sign, then slot 0's vote is swapped with slot 1's: both become
    // invalid (index mismatch), leaving 2 of 4 = 50%, under threshold
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let mut check = keys.gen_checkpoint(CHAIN, 1, app_hash(4), &vals, 0, 4);
    check.commit.votes.swap(0, 1);

    match verify_commit(CHAIN, &vals, &check) {
        Err(Error::TooMuchChange) => {}
        other => panic!("misplaced votes must not count, got {:?}", other),
    }
}

#[test]
fn test_corrupt_signature_downgraded_not_fatal() {
    // 4 of 4 sign; corrupting one signature leaves 3 of 4 = 75%, still enough
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let mut check = keys.gen_checkpoint(CHAIN, 1, app_hash(5), &vals, 0, 4);
    if let Some(v) = check.commit.votes[0].as_mut() {
        v.signature[0] ^= 0xFF;
    }
    assert!(
        verify_commit(CHAIN, &vals, &check).is_ok(),
        "one bad signature must only drop that vote"
    );

    // but if the loss drops power to the boundary, the commit fails
    let mut check = keys.gen_checkpoint(CHAIN, 1, app_hash(5), &vals, 0, 3);
    if let Some(v) = check.commit.votes[0].as_mut() {
        v.signature[0] ^= 0xFF;
    }
    match verify_commit(CHAIN, &vals, &check) {
        Err(Error::TooMuchChange) => {}
        other => panic!("expected TooMuchChange, got {:?}", other),
    }
}

#[test]
fn test_static_certifier_wrong_chain() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let cert = StaticCertifier::new(CHAIN, vals.clone());

    let check = keys.gen_checkpoint("other-chain", 1, app_hash(6), &vals, 0, 4);
    match cert.certify(&check) {
        Err(Error::WrongChain { .. }) => {}
        other => panic!("expected WrongChain, got {:?}", other),
    }
}

#[test]
fn test_static_certifier_signals_validators_changed() {
    let keys = ValKeys::generate(4);
    let vals = keys.to_validators(1, 0);
    let cert = StaticCertifier::new(CHAIN, vals);

    let other_vals = keys.change(0).to_validators(1, 0);
    let check = keys.gen_checkpoint(CHAIN, 1, app_hash(7), &other_vals, 0, 4);
    match cert.certify(&check) {
        Err(e) if e.is_validators_changed() => {}
        other => panic!("expected ValidatorsChanged, got {:?}", other),
    }
}

#[test]
fn test_certify_smoke_large_sets() {
    // echoes the upstream benches: flat 20 and weighted 100 validator sets
    for n in [20usize, 100] {
        let keys = ValKeys::generate(n);
        let vals = keys.to_validators(20, 10);
        let check = keys.gen_checkpoint(CHAIN, 123, app_hash(8), &vals, 0, n);
        assert!(verify_commit(CHAIN, &vals, &check).is_ok(), "n = {}", n);
    }
}
