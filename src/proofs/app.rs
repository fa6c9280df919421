use serde::{Deserialize, Serialize};

use crate::crypto::hash::{sha256_pair, sha256};
use crate::error::{Error, Result};
use crate::types::serialization::{CodecError, Decoder, Encoder};
use crate::types::{Checkpoint, Hash};

/// Upper bound on an encoded proof; proofs come from untrusted query
/// responses.
pub const MAX_PROOF_SIZE: usize = 1024 * 1024;

/// Deepest merkle branch accepted.
pub const MAX_PROOF_DEPTH: usize = 64;

/// One step of a merkle branch: the sibling hash and which side it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash,
    pub sibling_on_left: bool,
}

/// Positive merkle proof that `key` maps to `value` in the application state
/// at `height`. Only meaningful once validated against a *certified*
/// checkpoint of that exact height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppProof {
    pub height: u64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub steps: Vec<ProofStep>,
}

impl AppProof {
    pub fn encode(&self) -> Vec<u8> {
        let mut e = Encoder::new();
        e.put_u64(self.height);
        e.put_vec(&self.key);
        e.put_vec(&self.value);
        e.put_u32(self.steps.len() as u32);
        for step in &self.steps {
            e.put_u8(step.sibling_on_left as u8);
            e.put_bytes32(&step.sibling.0);
        }
        e.into_bytes()
    }

    /// Bounded, fallible decode. Untrusted bytes can never panic their way
    /// out of here.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_PROOF_SIZE {
            return Err(Error::OversizedInput {
                len: bytes.len(),
                max: MAX_PROOF_SIZE,
            });
        }
        let mut d = Decoder::new(bytes);
        let height = d.get_u64()?;
        let key = d.get_vec()?;
        let value = d.get_vec()?;
        let n = d.get_u32()? as usize;
        if n > MAX_PROOF_DEPTH {
            return Err(Error::InvalidProof("proof too deep"));
        }
        let mut steps = Vec::with_capacity(n);
        for _ in 0..n {
            let side = match d.get_u8()? {
                0 => false,
                1 => true,
                _ => return Err(Error::Codec(CodecError::Invalid("bad proof step tag"))),
            };
            steps.push(ProofStep {
                sibling: Hash(d.get_bytes32()?),
                sibling_on_left: side,
            });
        }
        Ok(Self {
            height,
            key,
            value,
            steps,
        })
    }

    pub fn block_height(&self) -> u64 {
        self.height
    }

    /// Check this proof against a trusted checkpoint. The proof must be for
    /// the checkpoint's exact height and its branch must fold to the
    /// header's app hash.
    pub fn validate(&self, check: &Checkpoint) -> Result<()> {
        if self.height != check.height() {
            return Err(Error::InvalidProof("proof height != checkpoint height"));
        }
        if self.steps.len() > MAX_PROOF_DEPTH {
            return Err(Error::InvalidProof("proof too deep"));
        }
        if self.root() != check.header.app_hash {
            return Err(Error::InvalidProof("did not fold to app hash"));
        }
        Ok(())
    }

    /// Root reached by folding the branch up from the key/value leaf.
    pub fn root(&self) -> Hash {
        let mut current = leaf_hash(&self.key, &self.value);
        for step in &self.steps {
            current = if step.sibling_on_left {
                sha256_pair(&step.sibling, &current)
            } else {
                sha256_pair(&current, &step.sibling)
            };
        }
        current
    }
}

/// Domain-separated leaf hash over the length-prefixed key/value pair.
pub fn leaf_hash(key: &[u8], value: &[u8]) -> Hash {
    let mut e = Encoder::new();
    e.put_vec(b"leaf");
    e.put_vec(key);
    e.put_vec(value);
    sha256(&e.into_bytes())
}
