use crate::crypto::hash::sha256;
use crate::types::serialization::Encoder;
use crate::types::{Address, Hash};
use serde::{Deserialize, Serialize};

/// Ed25519 verifying key bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Deterministic address: first 20 bytes of sha256(key).
    pub fn address(&self) -> Address {
        let digest = sha256(&self.0);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&digest.0[..20]);
        Address(addr)
    }
}

/// A weighted signer. The address is always derived from the key, including
/// on deserialization, so no encoding can smuggle in a mismatched pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ValidatorEncoding", into = "ValidatorEncoding")]
pub struct Validator {
    pub public_key: PublicKey,
    pub voting_power: u64,
    pub address: Address,
}

impl Validator {
    pub fn new(public_key: PublicKey, voting_power: u64) -> Self {
        Self {
            public_key,
            voting_power,
            address: public_key.address(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ValidatorEncoding {
    public_key: PublicKey,
    voting_power: u64,
}

impl From<ValidatorEncoding> for Validator {
    fn from(enc: ValidatorEncoding) -> Self {
        Validator::new(enc.public_key, enc.voting_power)
    }
}

impl From<Validator> for ValidatorEncoding {
    fn from(v: Validator) -> Self {
        ValidatorEncoding {
            public_key: v.public_key,
            voting_power: v.voting_power,
        }
    }
}

/// Ordered collection of validators. The order is significant: commit slot i
/// belongs to validator i, so a "change" is always a new set, never an
/// in-place mutation.
///
/// Serializes as the plain validator list; the power total is recomputed on
/// the way in so a tampered encoding cannot carry a false total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Validator>", into = "Vec<Validator>")]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    total_power: u64,
}

impl From<Vec<Validator>> for ValidatorSet {
    fn from(validators: Vec<Validator>) -> Self {
        Self::new(validators)
    }
}

impl From<ValidatorSet> for Vec<Validator> {
    fn from(vs: ValidatorSet) -> Self {
        vs.validators
    }
}

impl ValidatorSet {
    pub fn new(validators: Vec<Validator>) -> Self {
        let mut total = 0u64;
        for v in &validators {
            total = total.saturating_add(v.voting_power);
        }
        Self {
            validators,
            total_power: total,
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Validator> {
        self.validators.get(index)
    }

    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| &v.address == address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.index_of(address).is_some()
    }

    pub fn total_power(&self) -> u64 {
        self.total_power
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Content hash over the canonical encoding of all validators in order.
    pub fn hash(&self) -> Hash {
        let mut e = Encoder::new();
        e.put_u32(self.validators.len() as u32);
        for v in &self.validators {
            e.put_bytes32(&v.public_key.0);
            e.put_u64(v.voting_power);
        }
        sha256(&e.into_bytes())
    }
}
