use crate::types::serialization::Encoder;
use crate::types::{Address, BlockId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoteType {
    Prevote,
    Precommit,
}

/// A single precommit for one block, bound to a slot in the validator set by
/// both index and address. The signature covers `sign_bytes(chain_id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub validator_address: Address,
    pub validator_index: u32,
    pub height: u64,
    pub round: u32,
    pub vote_type: VoteType,
    pub block_id: BlockId,
    #[serde(with = "serde_bytes")]
    pub signature: [u8; 64], // ed25519 signature bytes
}

impl Vote {
    /// Canonical byte encoding signed by the validator. Includes the chain id
    /// so a vote cannot be replayed across chains.
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        let mut e = Encoder::new();
        e.put_vec(chain_id.as_bytes());
        e.put_u8(match self.vote_type {
            VoteType::Prevote => 1,
            VoteType::Precommit => 2,
        });
        e.put_u64(self.height);
        e.put_u32(self.round);
        e.put_bytes32(&self.block_id.hash.0);
        e.put_u32(self.validator_index);
        e.put_address(&self.validator_address);
        e.into_bytes()
    }
}
