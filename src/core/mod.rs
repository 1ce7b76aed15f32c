//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Blocks and transactions (opaque data or unlock/lock script pairs)
//! - Canonical serialization and chain validation
//! - The ledger itself (chain, pending buffer, mining, bootstrap)
//! - Longest-valid-chain consensus

pub mod block;
pub mod consensus;
pub mod ledger;
pub mod validation;

pub use block::{Block, Transaction, GENESIS_PREVIOUS_HASH};
pub use consensus::select_longest_valid;
pub use ledger::{Clock, GenesisKind, Ledger, SystemClock, GENESIS_MESSAGE};
pub use validation::{canonicalize, hash_of, is_valid_chain};
