//! Light-client trust extension for BFT chains.
//!
//! Starting from one trusted validator set, a client can:
//! 1. verify that a block header carries >2/3 of a set's voting power
//!    ([`certifiers::verify_commit`]),
//! 2. follow validator rotations, bridging arbitrarily large gaps by
//!    binary-searching an untrusted seed provider
//!    ([`certifiers::InquiringCertifier`]),
//! 3. check key/value merkle proofs against a certified header's app hash
//!    ([`proofs::AppProof`]).
//!
//! Certification never trusts its inputs: providers, seeds and proofs are
//! all re-verified, size-bounded and decoded fallibly.

#![forbid(unsafe_code)]

pub mod certifiers;
pub mod crypto;
pub mod error;
pub mod node;
pub mod proofs;
pub mod types;

pub use error::{Error, Result};
