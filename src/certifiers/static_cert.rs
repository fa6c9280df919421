use crate::certifiers::verify::verify_commit;
use crate::error::{Error, Result};
use crate::types::{Checkpoint, ValidatorSet};

/// Certifier over a fixed validator set. Stateless beyond construction; any
/// number may run concurrently over the same data.
#[derive(Clone, Debug)]
pub struct StaticCertifier {
    chain_id: String,
    vals: ValidatorSet,
}

impl StaticCertifier {
    pub fn new(chain_id: impl Into<String>, vals: ValidatorSet) -> Self {
        Self {
            chain_id: chain_id.into(),
            vals,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn validators(&self) -> &ValidatorSet {
        &self.vals
    }

    pub fn certify(&self, check: &Checkpoint) -> Result<()> {
        if check.header.chain_id != self.chain_id {
            return Err(Error::WrongChain {
                expected: self.chain_id.clone(),
                got: check.header.chain_id.clone(),
            });
        }
        let trusted = self.vals.hash();
        if check.header.validators_hash != trusted {
            return Err(Error::ValidatorsChanged {
                trusted,
                got: check.header.validators_hash,
            });
        }
        verify_commit(&self.chain_id, &self.vals, check)
    }
}
