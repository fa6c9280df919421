use crate::types::serialization::CodecError;
use crate::types::Hash;

/// Protocol errors. `TooMuchChange` and `ValidatorsChanged` are control-flow
/// signals the inquirer matches on, not terminal failures; everything else is
/// surfaced to the caller as-is.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    #[error("wrong chain: certifier is for {expected}, checkpoint is for {got}")]
    WrongChain { expected: String, got: String },

    /// Verified signing power did not exceed 2/3 of the supplied validator
    /// set's total. Recoverable: drives the update/search protocol.
    #[error("signed voting power insufficient for this validator set")]
    TooMuchChange,

    /// The header names a validator set other than the currently trusted one.
    /// Recoverable: triggers an update to the named hash.
    #[error("header validator hash {got} differs from trusted set {trusted}")]
    ValidatorsChanged { trusted: Hash, got: Hash },

    #[error("no path of verifiable validator-set updates to the target")]
    NoPathFound,

    #[error("seed not found")]
    SeedNotFound,

    #[error("input of {len} bytes exceeds limit of {max}")]
    OversizedInput { len: usize, max: usize },

    #[error("invalid proof: {0}")]
    InvalidProof(&'static str),

    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_too_much_change(&self) -> bool {
        matches!(self, Error::TooMuchChange)
    }

    pub fn is_validators_changed(&self) -> bool {
        matches!(self, Error::ValidatorsChanged { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SeedNotFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
