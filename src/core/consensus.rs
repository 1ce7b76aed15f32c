//! Longest-valid-chain consensus
//!
//! Given the chains collected from peers, pick the one that should replace
//! the local chain: strictly longer and internally valid. Selection is
//! synchronous and does no I/O; gossip happens at the network boundary.

use crate::core::block::Block;
use crate::core::validation::is_valid_chain;

/// Select the best replacement among candidate chains
///
/// Candidates are considered in the order received. A candidate qualifies
/// when it is strictly longer than `current_len` AND passes chain
/// validation; among qualifying candidates the longest wins. Equal-length
/// candidates never qualify, which keeps equally-long peers from flapping
/// the chain back and forth. Returns `None` when nothing qualifies.
pub fn select_longest_valid(
    current_len: usize,
    candidates: Vec<Vec<Block>>,
) -> Option<Vec<Block>> {
    let mut best_len = current_len;
    let mut best_chain = None;

    for candidate in candidates {
        if candidate.len() > best_len && is_valid_chain(&candidate) {
            best_len = candidate.len();
            best_chain = Some(candidate);
        }
    }

    best_chain
}
