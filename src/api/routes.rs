//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ledger
        .route("/mine", post(handlers::mine))
        .route("/chain", get(handlers::get_chain))
        // Transactions
        .route("/transactions/new", post(handlers::new_transaction))
        .route("/transactions/script", post(handlers::new_script_transaction))
        // Nodes
        .route("/nodes", get(handlers::list_nodes))
        .route("/nodes/register", post(handlers::register_nodes))
        .route("/nodes/consensus", post(handlers::consensus))
        // Chaos
        .route("/action/evil", post(handlers::pop_block))
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}
