//! Canonical serialization and chain validation
//!
//! The digest of a block is part of the chain-linking contract, so two
//! semantically identical blocks must produce byte-identical hash input no
//! matter how they were constructed.

use crate::core::block::Block;
use crate::crypto::sha256_hex;

/// Serialize a block into its canonical byte form
///
/// The block is routed through `serde_json::Value`, whose objects keep their
/// keys in lexicographic order at every nesting level (transactions
/// included), so field insertion order never leaks into the digest.
pub fn canonicalize(block: &Block) -> Vec<u8> {
    let value = serde_json::to_value(block).expect("block serializes to JSON");
    serde_json::to_vec(&value).expect("JSON value serializes to bytes")
}

/// SHA-256 digest of a block's canonical serialization, as lowercase hex
pub fn hash_of(block: &Block) -> String {
    sha256_hex(&canonicalize(block))
}

/// Verify the hash links of a chain
///
/// A chain of length 0 or 1 is trivially valid. Otherwise every block's
/// `previous_hash` must equal the digest of its immediate predecessor. The
/// genesis marker itself is never validated against a computed hash. Walks
/// the chain iteratively, hashing each predecessor exactly once and
/// stopping at the first mismatch.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    chain
        .windows(2)
        .all(|pair| pair[1].previous_hash == hash_of(&pair[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Transaction, GENESIS_PREVIOUS_HASH};

    fn sample_block(index: u64, previous_hash: &str) -> Block {
        Block {
            index,
            timestamp: 1231006505.25,
            transactions: vec![Transaction::Data {
                data: "sample".to_string(),
            }],
            previous_hash: previous_hash.to_string(),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let block = sample_block(1, GENESIS_PREVIOUS_HASH);
        let first = hash_of(&block);
        let second = hash_of(&block);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_hash_insensitive_to_field_order() {
        let a: Block = serde_json::from_str(
            r#"{"index":1,"timestamp":1.5,"transactions":[{"data":"x"}],"previous_hash":"0"}"#,
        )
        .unwrap();
        let b: Block = serde_json::from_str(
            r#"{"previous_hash":"0","transactions":[{"data":"x"}],"timestamp":1.5,"index":1}"#,
        )
        .unwrap();
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_hash_differs_on_content() {
        let a = sample_block(1, GENESIS_PREVIOUS_HASH);
        let mut b = a.clone();
        b.index = 2;
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_short_chains_are_valid() {
        assert!(is_valid_chain(&[]));
        assert!(is_valid_chain(&[sample_block(1, GENESIS_PREVIOUS_HASH)]));
    }

    #[test]
    fn test_linked_chain_is_valid() {
        let genesis = sample_block(1, GENESIS_PREVIOUS_HASH);
        let second = sample_block(2, &hash_of(&genesis));
        let third = sample_block(3, &hash_of(&second));
        assert!(is_valid_chain(&[genesis, second, third]));
    }

    #[test]
    fn test_broken_link_is_detected() {
        let genesis = sample_block(1, GENESIS_PREVIOUS_HASH);
        let second = sample_block(2, "not-the-right-digest");
        assert!(!is_valid_chain(&[genesis, second]));
    }

    #[test]
    fn test_tampered_predecessor_is_detected() {
        let mut genesis = sample_block(1, GENESIS_PREVIOUS_HASH);
        let second = sample_block(2, &hash_of(&genesis));
        genesis.timestamp += 1.0;
        assert!(!is_valid_chain(&[genesis, second]));
    }

    #[test]
    fn test_genesis_marker_is_not_recomputed() {
        // The marker is a literal, not a digest of anything
        let genesis = sample_block(1, GENESIS_PREVIOUS_HASH);
        let second = sample_block(2, &hash_of(&genesis));
        assert!(is_valid_chain(&[genesis, second]));
    }
}
