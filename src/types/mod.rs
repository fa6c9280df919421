pub mod address;
pub mod block;
pub mod hash;
pub mod serialization;
pub mod validator;
pub mod vote;

pub use address::Address;
pub use block::{BlockId, Checkpoint, Commit, Header};
pub use hash::Hash;
pub use validator::{PublicKey, Validator, ValidatorSet};
pub use vote::{Vote, VoteType};
