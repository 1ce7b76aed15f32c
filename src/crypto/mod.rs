//! Cryptographic hashing utilities
//!
//! SHA-256 helpers used for block digests.

pub mod hash;

pub use hash::{sha256, sha256_hex};
