use tracing::{debug, info};

use crate::certifiers::dynamic::DynamicCertifier;
use crate::certifiers::provider::Provider;
use crate::certifiers::seed::Seed;
use crate::error::{Error, Result};
use crate::types::{Checkpoint, Hash, ValidatorSet};

/// Certifier that can bridge validator-set changes by pulling intermediate
/// seeds from an untrusted provider.
///
/// A failed certify that signals `ValidatorsChanged` kicks off an update to
/// the header's claimed validator hash; if the jump is too large to verify in
/// one step (`TooMuchChange`), a divide-and-conquer search over heights
/// narrows the gap until each step is endorsed by a supermajority of the set
/// trusted before it. O(log gap) provider round-trips worst case, one in the
/// common single-rotation case.
pub struct InquiringCertifier<P> {
    cert: DynamicCertifier,
    provider: P,
}

impl<P: Provider> InquiringCertifier<P> {
    pub fn new(chain_id: impl Into<String>, vals: ValidatorSet, provider: P) -> Self {
        Self {
            cert: DynamicCertifier::new(chain_id, vals),
            provider,
        }
    }

    pub fn from_seed(chain_id: impl Into<String>, seed: &Seed, provider: P) -> Result<Self> {
        seed.verify_self()?;
        Ok(Self {
            cert: DynamicCertifier::with_height(
                chain_id,
                seed.validator_set.clone(),
                seed.height(),
            ),
            provider,
        })
    }

    pub fn last_height(&self) -> u64 {
        self.cert.last_height()
    }

    pub fn trusted_hash(&self) -> Hash {
        self.cert.trusted_hash()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Certify a checkpoint, chasing a validator-set change if that is the
    /// only thing in the way. Any other failure is final.
    pub fn certify(&self, check: &Checkpoint) -> Result<()> {
        match self.cert.certify(check) {
            Err(e) if e.is_validators_changed() => {}
            other => return other,
        }
        debug!(
            height = check.height(),
            target = %check.header.validators_hash,
            "validators changed, searching for update path"
        );
        self.update_to_hash(&check.header.validators_hash)?;
        self.cert.certify(check)
    }

    /// Adopt a seed's validator set and remember the seed for future
    /// queries.
    pub fn update(&self, seed: &Seed) -> Result<()> {
        seed.verify_self()?;
        self.cert.update(&seed.checkpoint, &seed.validator_set)?;
        if let Err(e) = self.provider.store_seed(seed) {
            debug!(height = seed.height(), error = %e, "seed store failed");
        }
        Ok(())
    }

    /// Update to the validator set with the given hash, falling back to a
    /// height search when the direct jump carries too much change.
    fn update_to_hash(&self, hash: &Hash) -> Result<()> {
        let seed = self.provider.get_by_hash(hash)?;
        seed.verify_self()?;
        match self.update(&seed) {
            Err(e) if e.is_too_much_change() => self.update_to_height(seed.height()),
            other => other,
        }
    }

    /// Divide-and-conquer search for a chain of crossable updates ending at
    /// `height`. Each failing level recurses on the midpoint of the interval
    /// between current trust and the target, so the interval strictly
    /// shrinks; a target at or behind current trust means the search is
    /// exhausted.
    fn update_to_height(&self, height: u64) -> Result<()> {
        // 2*log2(gap) levels suffice for a halving search; the slack absorbs
        // providers that answer with nearby heights
        let gap = height.saturating_sub(self.cert.last_height()).max(1);
        let budget = 2 * (64 - gap.leading_zeros()) + 4;
        self.update_to_height_inner(height, budget)
    }

    fn update_to_height_inner(&self, height: u64, budget: u32) -> Result<()> {
        if budget == 0 {
            return Err(Error::NoPathFound);
        }
        let seed = self.provider.get_by_height(height)?;
        seed.verify_self()?;

        let (start, end) = (self.cert.last_height(), seed.height());
        if end <= start {
            return Err(Error::NoPathFound);
        }

        match self.update(&seed) {
            Err(e) if e.is_too_much_change() => {}
            other => return other,
        }

        // too much change: cross to the midpoint first, then retry the
        // original target from the new trusted point
        let mid = start + (end - start) / 2;
        debug!(start, end, mid, "trust gap too wide, bisecting");
        self.update_to_height_inner(mid, budget - 1)?;
        info!(height = self.cert.last_height(), "intermediate trust point established");
        self.update_to_height_inner(height, budget - 1)
    }
}
