//! Known-node registry
//!
//! A flat set of peer addresses. Addresses arrive as opaque strings, with
//! or without an http scheme, and are stored normalized to `host:port`
//! form.

use std::collections::BTreeSet;
use thiserror::Error;

/// Address validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("malformed address '{0}'")]
    MalformedAddress(String),
}

/// Reduce a peer address to its `host:port` authority
///
/// Accepts both `http://127.0.0.1:5000` and bare `127.0.0.1:5000` forms;
/// any path suffix is dropped. Empty or whitespace-bearing authorities are
/// rejected.
pub fn normalize_address(address: &str) -> Result<String, AddressError> {
    let trimmed = address.trim();
    let rest = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let authority = rest.split('/').next().unwrap_or_default();

    if authority.is_empty() || authority.chars().any(char::is_whitespace) {
        return Err(AddressError::MalformedAddress(address.to_string()));
    }

    Ok(authority.to_string())
}

/// The set of peers this node gossips with
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and record a peer address
    ///
    /// Registering an already-known address is a no-op; a malformed address
    /// is reported without touching the set.
    pub fn register(&mut self, address: &str) -> Result<(), AddressError> {
        let authority = normalize_address(address)?;
        self.nodes.insert(authority);
        Ok(())
    }

    /// All known peers, in stable order
    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    /// Number of known peers
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no peers are known
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_with_scheme() {
        assert_eq!(
            normalize_address("http://127.0.0.1:5000").unwrap(),
            "127.0.0.1:5000"
        );
    }

    #[test]
    fn test_normalize_without_scheme() {
        assert_eq!(
            normalize_address("127.0.0.1:5000").unwrap(),
            "127.0.0.1:5000"
        );
    }

    #[test]
    fn test_normalize_drops_path() {
        assert_eq!(
            normalize_address("https://node.example.com:8080/chain").unwrap(),
            "node.example.com:8080"
        );
    }

    #[test]
    fn test_rejects_empty_and_scheme_only() {
        assert!(matches!(
            normalize_address(""),
            Err(AddressError::MalformedAddress(_))
        ));
        assert!(matches!(
            normalize_address("   "),
            Err(AddressError::MalformedAddress(_))
        ));
        assert!(matches!(
            normalize_address("http://"),
            Err(AddressError::MalformedAddress(_))
        ));
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert!(matches!(
            normalize_address("bad host:5000"),
            Err(AddressError::MalformedAddress(_))
        ));
    }

    #[test]
    fn test_register_deduplicates() {
        let mut registry = NodeRegistry::new();
        registry.register("http://127.0.0.1:5001").unwrap();
        registry.register("127.0.0.1:5001").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.to_vec(), vec!["127.0.0.1:5001".to_string()]);
    }

    #[test]
    fn test_register_rejects_garbage_without_side_effects() {
        let mut registry = NodeRegistry::new();
        assert!(registry.register("http://").is_err());
        assert!(registry.is_empty());
    }
}
