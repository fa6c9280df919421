use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::hash::sha256;
use crate::error::{Error, Result};
use crate::types::serialization::{
    decode_checkpoint, decode_validator_set, encode_checkpoint, encode_validator_set, CodecError,
    Decoder, Encoder,
};
use crate::types::{Checkpoint, Hash, ValidatorSet};

/// Upper bound on a serialized seed. Anything larger is rejected before
/// decoding so a malicious store or provider cannot balloon memory.
pub const MAX_SEED_SIZE: usize = 1024 * 1024;

/// A checkpoint plus the validator set its header claims: everything needed
/// to move trust to that point, assuming knowledge of some previous set.
/// This is the unit exchanged with providers and persisted locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub checkpoint: Checkpoint,
    pub validator_set: ValidatorSet,
}

impl Seed {
    pub fn new(checkpoint: Checkpoint, validator_set: ValidatorSet) -> Self {
        Self {
            checkpoint,
            validator_set,
        }
    }

    pub fn height(&self) -> u64 {
        self.checkpoint.height()
    }

    /// The validator hash this seed can update to.
    pub fn hash(&self) -> Hash {
        self.checkpoint.header.validators_hash
    }

    /// A seed is only usable if the validator set it carries really is the
    /// one its header names. Cheap to check, checked on every load and on
    /// every provider response.
    pub fn verify_self(&self) -> Result<()> {
        if self.validator_set.hash() != self.checkpoint.header.validators_hash {
            return Err(Error::MalformedInput(
                "seed validator set does not match header claim",
            ));
        }
        Ok(())
    }

    /// Canonical binary form: length-prefixed payload followed by a sha256
    /// checksum of it.
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Encoder::new();
        encode_checkpoint(&mut payload, &self.checkpoint);
        encode_validator_set(&mut payload, &self.validator_set);
        let payload = payload.into_bytes();

        let checksum = sha256(&payload);
        let mut e = Encoder::new();
        e.put_vec(&payload);
        e.put_bytes32(&checksum.0);
        e.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_SEED_SIZE {
            return Err(Error::OversizedInput {
                len: bytes.len(),
                max: MAX_SEED_SIZE,
            });
        }
        let mut d = Decoder::new(bytes);
        let payload = d.get_vec()?;
        let checksum = Hash(d.get_bytes32()?);
        if sha256(&payload) != checksum {
            return Err(Error::Codec(CodecError::Invalid("seed checksum mismatch")));
        }

        let mut d = Decoder::new(&payload);
        let checkpoint = decode_checkpoint(&mut d)?;
        let validator_set = decode_validator_set(&mut d)?;
        let seed = Self {
            checkpoint,
            validator_set,
        };
        seed.verify_self()?;
        Ok(seed)
    }

    /// Write the binary form to a file.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.encode())?;
        debug!(height = self.height(), path = %path.display(), "seed written");
        Ok(())
    }

    /// Load the binary form from a file. Missing file maps to
    /// `SeedNotFound`; an oversized file is rejected before it is read.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_bounded(path)?;
        Self::decode(&bytes)
    }

    /// Write the JSON form (interoperability / debugging).
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let bytes = read_bounded(path)?;
        let seed: Seed = serde_json::from_slice(&bytes)?;
        seed.verify_self()?;
        Ok(seed)
    }
}

fn read_bounded(path: &Path) -> Result<Vec<u8>> {
    let meta = fs::metadata(path).map_err(not_found)?;
    if meta.len() > MAX_SEED_SIZE as u64 {
        return Err(Error::OversizedInput {
            len: meta.len() as usize,
            max: MAX_SEED_SIZE,
        });
    }
    fs::read(path).map_err(not_found)
}

fn not_found(e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::NotFound {
        Error::SeedNotFound
    } else {
        Error::Io(e)
    }
}
