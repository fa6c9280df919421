//! Test support: deterministic generation of keypairs, validator sets and
//! signed checkpoints. Used by the integration tests and usable by
//! downstream crates mocking a chain.

use ed25519_dalek::SigningKey;

use crate::certifiers::seed::Seed;
use crate::crypto::ed25519;
use crate::crypto::hash::sha256;
use crate::types::{
    BlockId, Checkpoint, Commit, Hash, Header, PublicKey, Validator, ValidatorSet, Vote, VoteType,
};

/// A set of signing keys simulating the chain's validators. Ordering matters:
/// key i signs commit slot i.
#[derive(Clone)]
pub struct ValKeys {
    keys: Vec<SigningKey>,
}

impl ValKeys {
    /// Generate n fresh keypairs.
    pub fn generate(n: usize) -> Self {
        let keys = (0..n).map(|_| ed25519::generate_keypair().0).collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A copy with the key at index i replaced by a fresh one.
    pub fn change(&self, i: usize) -> Self {
        let mut keys = self.keys.clone();
        keys[i] = ed25519::generate_keypair().0;
        Self { keys }
    }

    /// A copy extended with n more fresh keys. To remove, take a slice via
    /// `truncate`.
    pub fn extend(&self, n: usize) -> Self {
        let mut keys = self.keys.clone();
        keys.extend((0..n).map(|_| ed25519::generate_keypair().0));
        Self { keys }
    }

    pub fn truncate(&self, n: usize) -> Self {
        Self {
            keys: self.keys[..n].to_vec(),
        }
    }

    /// Validator set over these keys. The first validator has power `init`,
    /// increasing by `inc` per slot: flat or linear distributions are all the
    /// tests need.
    pub fn to_validators(&self, init: u64, inc: u64) -> ValidatorSet {
        let validators = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                Validator::new(
                    PublicKey(k.verifying_key().to_bytes()),
                    init + i as u64 * inc,
                )
            })
            .collect();
        ValidatorSet::new(validators)
    }

    /// Sign `header` with keys `first..last`, leaving other slots empty.
    pub fn sign_header(&self, header: &Header, first: usize, last: usize) -> Commit {
        let vals = self.to_validators(1, 0);
        let block_id = BlockId {
            hash: header.hash(),
        };
        let mut votes: Vec<Option<Vote>> = vec![None; self.keys.len()];
        for i in first..last.min(self.keys.len()) {
            votes[i] = Some(make_vote(header, &vals, i, &self.keys[i]));
        }
        Commit { block_id, votes }
    }

    /// Header + commit signed by keys `first..last`.
    pub fn gen_checkpoint(
        &self,
        chain_id: &str,
        height: u64,
        app_hash: Hash,
        vals: &ValidatorSet,
        first: usize,
        last: usize,
    ) -> Checkpoint {
        let header = gen_header(chain_id, height, app_hash, vals);
        let commit = self.sign_header(&header, first, last);
        Checkpoint { header, commit }
    }

    /// A full seed: checkpoint signed by `first..last` of these keys, paired
    /// with `vals` (the set the header names).
    pub fn gen_seed(
        &self,
        chain_id: &str,
        height: u64,
        app_hash: Hash,
        vals: &ValidatorSet,
        first: usize,
        last: usize,
    ) -> Seed {
        Seed::new(
            self.gen_checkpoint(chain_id, height, app_hash, vals, first, last),
            vals.clone(),
        )
    }
}

fn make_vote(header: &Header, vals: &ValidatorSet, index: usize, key: &SigningKey) -> Vote {
    let address = PublicKey(key.verifying_key().to_bytes()).address();
    debug_assert_eq!(vals.index_of(&address), Some(index));
    let mut vote = Vote {
        validator_address: address,
        validator_index: index as u32,
        height: header.height,
        round: 1,
        vote_type: VoteType::Precommit,
        block_id: BlockId {
            hash: header.hash(),
        },
        signature: [0u8; 64],
    };
    vote.signature = ed25519::sign(key, &vote.sign_bytes(&header.chain_id));
    vote
}

pub fn gen_header(chain_id: &str, height: u64, app_hash: Hash, vals: &ValidatorSet) -> Header {
    Header {
        chain_id: chain_id.to_string(),
        height,
        time_ms: 1_700_000_000_000 + height * 1000,
        tx_count: 0,
        data_hash: sha256(&height.to_be_bytes()),
        validators_hash: vals.hash(),
        app_hash,
        last_block_id: BlockId::default(),
        last_commit_hash: Hash::ZERO,
    }
}
