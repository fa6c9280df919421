pub mod app;

pub use app::{AppProof, ProofStep, MAX_PROOF_DEPTH, MAX_PROOF_SIZE};
