//! Mini-Ledger: a minimal append-only, hash-linked ledger in Rust
//!
//! This crate provides a small but complete ledger node featuring:
//! - Hash-linked chain with genesis bootstrap and integrity validation
//! - Transactions carrying either opaque data or unlock/lock script pairs
//! - Restricted script interpreter (assignment, arithmetic, literals)
//! - Longest-valid-chain consensus over a registered peer set
//! - HTTP node with pull-based chain gossip
//!
//! # Example
//!
//! ```rust
//! use mini_ledger::core::Ledger;
//!
//! // A fresh ledger auto-mines its genesis block
//! let mut ledger = Ledger::new();
//! assert_eq!(ledger.get_chain().len(), 1);
//!
//! // Queue work and commit it into a block
//! ledger.add_transaction("hello");
//! let block = ledger.mine().expect("chain is valid and work is pending");
//! assert_eq!(block.index, 2);
//! assert!(ledger.is_valid());
//! ```

pub mod api;
pub mod core;
pub mod crypto;
pub mod network;
pub mod script;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use core::{
    Block, Clock, GenesisKind, Ledger, SystemClock, Transaction, GENESIS_MESSAGE,
    GENESIS_PREVIOUS_HASH,
};
pub use network::{AddressError, NodeRegistry};
pub use script::{run_transaction, ScriptError, Value};
