use crate::crypto::hash::sha256;
use crate::types::serialization::{encode_header, Encoder};
use crate::types::{Hash, Vote};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    pub hash: Hash,
}

/// Block header as seen by the light client. `validators_hash` names the
/// validator set expected to sign the next block at this height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub chain_id: String,
    pub height: u64,
    pub time_ms: u64,
    pub tx_count: u32,
    pub data_hash: Hash,
    pub validators_hash: Hash,
    pub app_hash: Hash,
    pub last_block_id: BlockId,
    pub last_commit_hash: Hash,
}

impl Header {
    pub fn hash(&self) -> Hash {
        let mut e = Encoder::new();
        encode_header(&mut e, self);
        sha256(&e.into_bytes())
    }
}

/// The precommits collected for one block. Slot i is either absent or a vote
/// from validator i of the set being tallied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub block_id: BlockId,
    pub votes: Vec<Option<Vote>>,
}

impl Commit {
    /// Height claimed by the first present vote, 0 for an empty commit.
    pub fn height(&self) -> u64 {
        self.votes
            .iter()
            .flatten()
            .next()
            .map(|v| v.height)
            .unwrap_or(0)
    }
}

/// A header paired with its commit: the unit submitted for certification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub header: Header,
    pub commit: Commit,
}

impl Checkpoint {
    pub fn height(&self) -> u64 {
        self.header.height
    }
}
