use tracing::debug;

use crate::crypto::ed25519;
use crate::error::{Error, Result};
use crate::types::{Checkpoint, ValidatorSet, Vote, VoteType};

/// Supermajority check: strictly greater than 2/3 of total. Widened to u128
/// so `3 * signed` cannot overflow near u64::MAX.
pub fn has_supermajority(signed: u64, total: u64) -> bool {
    3 * signed as u128 > 2 * total as u128
}

/// Verify a checkpoint's commit against a validator set. Pure: no state is
/// read or written.
///
/// Structural mismatches are fatal (`MalformedInput`). An individual vote
/// that fails index binding or signature verification is treated as absent;
/// the commit as a whole only fails if the surviving power does not exceed
/// 2/3 of the set's total (`TooMuchChange`).
pub fn verify_commit(chain_id: &str, vals: &ValidatorSet, check: &Checkpoint) -> Result<()> {
    let commit = &check.commit;
    if commit.votes.len() != vals.len() {
        return Err(Error::MalformedInput("commit length != validator set size"));
    }
    let header_hash = check.header.hash();
    if commit.block_id.hash != header_hash {
        return Err(Error::MalformedInput("commit block id != header hash"));
    }

    let mut signed_power = 0u64;
    for (i, slot) in commit.votes.iter().enumerate() {
        let vote = match slot {
            Some(v) => v,
            None => continue,
        };
        if !vote_counts(chain_id, vals, check, i, vote) {
            debug!(slot = i, height = check.height(), "discarding invalid precommit");
            continue;
        }
        // index binding was checked, so the validator exists
        if let Some(v) = vals.get(i) {
            signed_power = signed_power.saturating_add(v.voting_power);
        }
    }

    if has_supermajority(signed_power, vals.total_power()) {
        Ok(())
    } else {
        Err(Error::TooMuchChange)
    }
}

fn vote_counts(
    chain_id: &str,
    vals: &ValidatorSet,
    check: &Checkpoint,
    slot: usize,
    vote: &Vote,
) -> bool {
    if vote.validator_index as usize != slot {
        return false;
    }
    let validator = match vals.get(slot) {
        Some(v) => v,
        None => return false,
    };
    if vote.validator_address != validator.address {
        return false;
    }
    if vote.vote_type != VoteType::Precommit {
        return false;
    }
    if vote.height != check.header.height {
        return false;
    }
    if vote.block_id != check.commit.block_id {
        return false;
    }
    let msg = vote.sign_bytes(chain_id);
    ed25519::verify_raw(&validator.public_key, &msg, &vote.signature)
}
