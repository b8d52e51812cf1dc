//! Git operations: revision resolution and changeset extraction.

pub mod changeset;
pub mod repository;

pub use changeset::file_patches;
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
