use crate::types::{
    block::{BlockId, Checkpoint, Commit, Header},
    hash::Hash,
    validator::{PublicKey, Validator, ValidatorSet},
    vote::{Vote, VoteType},
    Address,
};

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("unexpected eof")]
    Eof,
    #[error("invalid data: {0}")]
    Invalid(&'static str),
}

pub struct Encoder {
    buf: Vec<u8>,
}
impl Encoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }
    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    pub fn put_address(&mut self, v: &Address) {
        self.buf.extend_from_slice(&v.0);
    }
    pub fn put_bytes32(&mut self, v: &[u8; 32]) {
        self.buf.extend_from_slice(v);
    }
    pub fn put_bytes64(&mut self, v: &[u8; 64]) {
        self.buf.extend_from_slice(v);
    }
    pub fn put_vec(&mut self, data: &[u8]) {
        self.put_u32(data.len() as u32);
        self.buf.extend_from_slice(data);
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}
impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.pos + n > self.data.len() {
            return Err(CodecError::Eof);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }
    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }
    pub fn get_address(&mut self) -> Result<Address, CodecError> {
        let b = self.take(20)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(b);
        Ok(Address(out))
    }
    pub fn get_bytes32(&mut self) -> Result<[u8; 32], CodecError> {
        let b = self.take(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(b);
        Ok(out)
    }
    pub fn get_bytes64(&mut self) -> Result<[u8; 64], CodecError> {
        let b = self.take(64)?;
        let mut out = [0u8; 64];
        out.copy_from_slice(b);
        Ok(out)
    }
    pub fn get_vec(&mut self) -> Result<Vec<u8>, CodecError> {
        let n = self.get_u32()? as usize;
        if n > self.remaining() {
            return Err(CodecError::Eof);
        }
        let b = self.take(n)?;
        Ok(b.to_vec())
    }
}

// ---- VoteType ----
fn encode_vote_type(t: VoteType) -> u8 {
    match t {
        VoteType::Prevote => 1,
        VoteType::Precommit => 2,
    }
}
fn decode_vote_type(b: u8) -> Result<VoteType, CodecError> {
    match b {
        1 => Ok(VoteType::Prevote),
        2 => Ok(VoteType::Precommit),
        _ => Err(CodecError::Invalid("unknown VoteType")),
    }
}

// ---- Header ----
pub fn encode_header(e: &mut Encoder, h: &Header) {
    e.put_vec(h.chain_id.as_bytes());
    e.put_u64(h.height);
    e.put_u64(h.time_ms);
    e.put_u32(h.tx_count);
    e.put_bytes32(&h.data_hash.0);
    e.put_bytes32(&h.validators_hash.0);
    e.put_bytes32(&h.app_hash.0);
    e.put_bytes32(&h.last_block_id.hash.0);
    e.put_bytes32(&h.last_commit_hash.0);
}

pub fn decode_header(d: &mut Decoder<'_>) -> Result<Header, CodecError> {
    let chain_id = String::from_utf8(d.get_vec()?)
        .map_err(|_| CodecError::Invalid("chain id not utf-8"))?;
    Ok(Header {
        chain_id,
        height: d.get_u64()?,
        time_ms: d.get_u64()?,
        tx_count: d.get_u32()?,
        data_hash: Hash(d.get_bytes32()?),
        validators_hash: Hash(d.get_bytes32()?),
        app_hash: Hash(d.get_bytes32()?),
        last_block_id: BlockId {
            hash: Hash(d.get_bytes32()?),
        },
        last_commit_hash: Hash(d.get_bytes32()?),
    })
}

// ---- Vote ----
fn encode_vote(e: &mut Encoder, v: &Vote) {
    e.put_address(&v.validator_address);
    e.put_u32(v.validator_index);
    e.put_u64(v.height);
    e.put_u32(v.round);
    e.put_u8(encode_vote_type(v.vote_type));
    e.put_bytes32(&v.block_id.hash.0);
    e.put_bytes64(&v.signature);
}

fn decode_vote(d: &mut Decoder<'_>) -> Result<Vote, CodecError> {
    Ok(Vote {
        validator_address: d.get_address()?,
        validator_index: d.get_u32()?,
        height: d.get_u64()?,
        round: d.get_u32()?,
        vote_type: decode_vote_type(d.get_u8()?)?,
        block_id: BlockId {
            hash: Hash(d.get_bytes32()?),
        },
        signature: d.get_bytes64()?,
    })
}

// ---- Commit ----
pub fn encode_commit(e: &mut Encoder, c: &Commit) {
    e.put_bytes32(&c.block_id.hash.0);
    e.put_u32(c.votes.len() as u32);
    for slot in &c.votes {
        match slot {
            None => e.put_u8(0),
            Some(v) => {
                e.put_u8(1);
                encode_vote(e, v);
            }
        }
    }
}

pub fn decode_commit(d: &mut Decoder<'_>) -> Result<Commit, CodecError> {
    let block_id = BlockId {
        hash: Hash(d.get_bytes32()?),
    };
    let n = d.get_u32()? as usize;
    // Each present slot is at least a vote's fixed footprint; an absent slot
    // is one byte. Reject counts the input cannot possibly hold.
    if n > d.remaining() {
        return Err(CodecError::Invalid("commit slot count too large"));
    }
    let mut votes = Vec::with_capacity(n);
    for _ in 0..n {
        match d.get_u8()? {
            0 => votes.push(None),
            1 => votes.push(Some(decode_vote(d)?)),
            _ => return Err(CodecError::Invalid("bad vote slot tag")),
        }
    }
    Ok(Commit { block_id, votes })
}

// ---- ValidatorSet ----
pub fn encode_validator_set(e: &mut Encoder, vs: &ValidatorSet) {
    e.put_u32(vs.len() as u32);
    for v in vs.validators() {
        e.put_bytes32(&v.public_key.0);
        e.put_u64(v.voting_power);
    }
}

pub fn decode_validator_set(d: &mut Decoder<'_>) -> Result<ValidatorSet, CodecError> {
    let n = d.get_u32()? as usize;
    if n.saturating_mul(40) > d.remaining() {
        return Err(CodecError::Invalid("validator count too large"));
    }
    let mut validators = Vec::with_capacity(n);
    for _ in 0..n {
        let key = PublicKey(d.get_bytes32()?);
        let power = d.get_u64()?;
        validators.push(Validator::new(key, power));
    }
    Ok(ValidatorSet::new(validators))
}

// ---- Checkpoint ----
pub fn encode_checkpoint(e: &mut Encoder, c: &Checkpoint) {
    encode_header(e, &c.header);
    encode_commit(e, &c.commit);
}

pub fn decode_checkpoint(d: &mut Decoder<'_>) -> Result<Checkpoint, CodecError> {
    Ok(Checkpoint {
        header: decode_header(d)?,
        commit: decode_commit(d)?,
    })
}
