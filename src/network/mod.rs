//! Network boundary
//!
//! Everything the core consumes from the outside world lives here:
//! - A registry of known peer addresses with normalization and validation
//! - Pull-based gossip that collects peer chains over HTTP
//!
//! The core itself never parses URLs or performs I/O; consensus receives
//! already-materialized candidate chains.

pub mod gossip;
pub mod registry;

pub use gossip::collect_chains;
pub use registry::{normalize_address, AddressError, NodeRegistry};
