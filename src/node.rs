//! Interface boundary to a full node. Nothing behind these traits is
//! trusted: everything they return is re-verified by the certifiers and the
//! proof verifier before it means anything.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Commit, Hash, Header, ValidatorSet};

/// Result of submitting raw signed transaction bytes. Cannot be fully
/// trusted without certifying the headers it names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub code: u32,
    pub log: String,
    pub height: u64,
    pub tx_hash: Hash,
}

/// State query response: key/value at a height, with the proof bytes to
/// check against a certified header's app hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryResult {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub height: u64,
    pub proof: Vec<u8>,
}

/// Header plus the commit that sealed it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockMeta {
    pub header: Header,
    pub commit: Commit,
}

/// Sends signed transactions to the chain.
pub trait Broadcaster {
    fn broadcast(&self, tx: &[u8]) -> Result<BroadcastResult>;
}

/// Fetches chain data needed to build seeds and proofs. Headers and commits
/// only prove anything once checked together by a certifier.
pub trait Checker {
    fn query(&self, path: &str, data: &[u8], prove: bool) -> Result<QueryResult>;
    fn headers(&self, min_height: u64, max_height: u64) -> Result<Vec<BlockMeta>>;
    fn validators(&self, height: u64) -> Result<ValidatorSet>;
}

/// A queryable node, typically RPC-backed but mockable in tests.
pub trait Node: Broadcaster + Checker {}

impl<T: Broadcaster + Checker> Node for T {}
