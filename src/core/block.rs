//! Block and transaction types
//!
//! A block is an immutable, ordered batch of transactions linked to its
//! predecessor by hash. Transactions are immutable once placed in a block.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// `previous_hash` marker carried by the genesis block instead of a digest
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A transaction queued for, or committed into, a block
///
/// The two variants share the wire without a tag: an opaque transaction is
/// `{"data": ...}`, a scripted one is `{"input": ..., "script": ...,
/// "output": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transaction {
    /// Opaque payload carried as-is into the next block
    Data {
        /// Arbitrary client-supplied data
        data: String,
    },
    /// Unlock/lock script pair with the output computed at submission time
    Script {
        /// Unlock script that feeds values into the shared scope
        input: String,
        /// Lock script that reads the scope and binds `output`
        script: String,
        /// Value bound to `output` after both scripts ran, or null when
        /// execution failed or never bound it
        output: JsonValue,
    },
}

/// A block in the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain, strictly increasing, no gaps
    pub index: u64,
    /// Wall-clock creation time, fractional seconds since the epoch
    pub timestamp: f64,
    /// Ordered transactions, never empty
    pub transactions: Vec<Transaction>,
    /// Digest of the preceding block, or [`GENESIS_PREVIOUS_HASH`] for block 1
    pub previous_hash: String,
}
