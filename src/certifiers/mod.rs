//! Trust-extension core: commit verification against a weighted validator
//! set, the state machine tracking the currently trusted set, and the
//! divide-and-conquer search that bridges validator rotations too large to
//! verify in one step.

pub mod dynamic;
pub mod helper;
pub mod inquirer;
pub mod provider;
pub mod seed;
pub mod static_cert;
pub mod verify;

pub use dynamic::DynamicCertifier;
pub use inquirer::InquiringCertifier;
pub use provider::{CacheProvider, FileProvider, MemProvider, Provider};
pub use seed::{Seed, MAX_SEED_SIZE};
pub use static_cert::StaticCertifier;
pub use verify::{has_supermajority, verify_commit};
