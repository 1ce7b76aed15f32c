//! REST API module
//!
//! Provides the HTTP surface of a ledger node.
//!
//! # Endpoints
//!
//! ## Ledger
//! - `POST /mine` - Commit pending transactions into a new block
//! - `GET /chain` - Full chain and its validity
//!
//! ## Transactions
//! - `POST /transactions/new` - Queue an opaque-data transaction
//! - `POST /transactions/script` - Run an unlock/lock pair and queue it
//!
//! ## Nodes
//! - `GET /nodes` - Node identity and known peers
//! - `POST /nodes/register` - Register peer addresses
//! - `POST /nodes/consensus` - Gossip with peers, adopt the best chain
//!
//! ## Chaos
//! - `POST /action/evil` - Drop the most recent block (never genesis)

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
