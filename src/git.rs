//! Git repository access for running interactive rebases.

pub mod rebase;

pub use rebase::{RebaseOutcome, RebaseRunner};

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
