use std::sync::RwLock;

use tracing::info;

use crate::certifiers::static_cert::StaticCertifier;
use crate::certifiers::verify::verify_commit;
use crate::error::{Error, Result};
use crate::types::{Checkpoint, Hash, ValidatorSet};

struct Trust {
    vals: ValidatorSet,
    vals_hash: Hash,
    last_height: u64,
}

/// Certifier whose trusted validator set can move forward. Trust only
/// advances through `update` calls where the new checkpoint is endorsed by a
/// supermajority of the *previously* trusted set; this is what stops an
/// attacker who controls some future validator set from forging a jump.
///
/// `certify` takes a read snapshot of the trust state, so concurrent calls
/// run unsynchronized; `update` serializes on the write lock and replaces the
/// trusted set and height in one critical section.
pub struct DynamicCertifier {
    chain_id: String,
    trust: RwLock<Trust>,
}

impl DynamicCertifier {
    pub fn new(chain_id: impl Into<String>, vals: ValidatorSet) -> Self {
        Self::with_height(chain_id, vals, 0)
    }

    pub fn with_height(chain_id: impl Into<String>, vals: ValidatorSet, last_height: u64) -> Self {
        let vals_hash = vals.hash();
        Self {
            chain_id: chain_id.into(),
            trust: RwLock::new(Trust {
                vals,
                vals_hash,
                last_height,
            }),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn last_height(&self) -> u64 {
        self.trust.read().unwrap_or_else(|e| e.into_inner()).last_height
    }

    pub fn trusted_hash(&self) -> Hash {
        self.trust.read().unwrap_or_else(|e| e.into_inner()).vals_hash
    }

    /// Snapshot of the currently trusted validator set.
    pub fn trusted_validators(&self) -> ValidatorSet {
        self.trust
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .vals
            .clone()
    }

    /// Certify against the currently trusted set. `ValidatorsChanged` and
    /// `TooMuchChange` pass through untouched; resolving them is the
    /// inquirer's job.
    pub fn certify(&self, check: &Checkpoint) -> Result<()> {
        let cert = {
            let trust = self.trust.read().unwrap_or_else(|e| e.into_inner());
            StaticCertifier::new(self.chain_id.clone(), trust.vals.clone())
        };
        cert.certify(check)?;

        let mut trust = self.trust.write().unwrap_or_else(|e| e.into_inner());
        if check.height() > trust.last_height {
            trust.last_height = check.height();
        }
        Ok(())
    }

    /// Adopt `new_vals` as the trusted set, provided the header itself claims
    /// it and the checkpoint carries a supermajority of the *old* set. Either
    /// the whole trust state is replaced or nothing is.
    pub fn update(&self, check: &Checkpoint, new_vals: &ValidatorSet) -> Result<()> {
        if check.header.chain_id != self.chain_id {
            return Err(Error::WrongChain {
                expected: self.chain_id.clone(),
                got: check.header.chain_id.clone(),
            });
        }
        let new_hash = new_vals.hash();
        if check.header.validators_hash != new_hash {
            return Err(Error::ValidatorsChanged {
                trusted: new_hash,
                got: check.header.validators_hash,
            });
        }

        let mut trust = self.trust.write().unwrap_or_else(|e| e.into_inner());
        verify_commit(&self.chain_id, &trust.vals, check)?;

        info!(
            height = check.height(),
            vals = %new_hash,
            "trusted validator set updated"
        );
        trust.vals = new_vals.clone();
        trust.vals_hash = new_hash;
        if check.height() > trust.last_height {
            trust.last_height = check.height();
        }
        Ok(())
    }
}
