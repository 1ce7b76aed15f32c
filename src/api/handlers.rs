//! REST API handlers for ledger operations

use crate::core::{Block, Ledger, Transaction};
use crate::network::{gossip, NodeRegistry};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
///
/// One lock per ledger instance: every handler takes the write or read side
/// for the whole operation, so ledger mutations never interleave.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub registry: Arc<RwLock<NodeRegistry>>,
    pub http: reqwest::Client,
    pub node_id: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct MineResponse {
    pub new_block: Option<Block>,
    pub is_valid: bool,
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub is_valid: bool,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub total_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub node_id: String,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ConsensusResponse {
    pub status: String,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct PopResponse {
    pub status: String,
    pub element: Option<Block>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub data: String,
}

#[derive(Deserialize)]
pub struct ScriptTransactionRequest {
    pub unlock: String,
    pub lock: String,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /mine - Commit the pending buffer into a new block
///
/// 201 when the chain is valid after the call, 200 otherwise. A null
/// `new_block` means nothing was mined (empty buffer or invalid chain).
pub async fn mine(State(state): State<ApiState>) -> (StatusCode, Json<MineResponse>) {
    let mut ledger = state.ledger.write().await;
    let new_block = ledger.mine();
    let is_valid = ledger.is_valid();

    if let Some(block) = &new_block {
        log::info!("mined block {}", block.index);
    }

    let status = if is_valid {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(MineResponse { new_block, is_valid }))
}

/// POST /transactions/new - Queue an opaque-data transaction
pub async fn new_transaction(
    State(state): State<ApiState>,
    Json(req): Json<NewTransactionRequest>,
) -> (StatusCode, Json<TransactionResponse>) {
    let mut ledger = state.ledger.write().await;
    let transaction = ledger.add_transaction(req.data);
    (StatusCode::CREATED, Json(TransactionResponse { transaction }))
}

/// POST /transactions/script - Run a script pair and queue the result
pub async fn new_script_transaction(
    State(state): State<ApiState>,
    Json(req): Json<ScriptTransactionRequest>,
) -> (StatusCode, Json<TransactionResponse>) {
    let mut ledger = state.ledger.write().await;
    let transaction = ledger.add_script_transaction(&req.unlock, &req.lock);
    (StatusCode::CREATED, Json(TransactionResponse { transaction }))
}

/// GET /chain - The full chain and its validity
pub async fn get_chain(State(state): State<ApiState>) -> Json<ChainResponse> {
    let ledger = state.ledger.read().await;
    Json(ChainResponse {
        chain: ledger.get_chain().to_vec(),
        is_valid: ledger.is_valid(),
    })
}

/// POST /nodes/register - Add peers to the known-node set
///
/// Malformed entries are collected and reported alongside the accepted
/// ones; they never fail the whole batch.
pub async fn register_nodes(
    State(state): State<ApiState>,
    Json(req): Json<RegisterNodesRequest>,
) -> Result<(StatusCode, Json<RegisterNodesResponse>), (StatusCode, Json<ApiError>)> {
    if req.nodes.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "Missing list of nodes".to_string(),
            }),
        ));
    }

    let mut registry = state.registry.write().await;
    let mut invalid_nodes = Vec::new();
    for node in &req.nodes {
        if let Err(err) = registry.register(node) {
            log::warn!("rejected node address: {err}");
            invalid_nodes.push(node.clone());
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            total_nodes: registry.to_vec(),
            invalid_nodes,
        }),
    ))
}

/// GET /nodes - This node's identity and its known peers
pub async fn list_nodes(State(state): State<ApiState>) -> Json<NodesResponse> {
    let registry = state.registry.read().await;
    Json(NodesResponse {
        node_id: state.node_id.clone(),
        nodes: registry.to_vec(),
    })
}

/// POST /nodes/consensus - Gossip with peers and adopt the best chain
pub async fn consensus(State(state): State<ApiState>) -> Json<ConsensusResponse> {
    // Snapshot the peer set; the fan-out happens without holding any lock
    let nodes = state.registry.read().await.to_vec();
    let collected_chains = gossip::collect_chains(&state.http, &nodes).await;

    let mut ledger = state.ledger.write().await;
    let replaced = ledger.evaluate_consensus(collected_chains);

    let status = if replaced {
        "Chain replaced"
    } else {
        "Chain not replaced - master"
    };
    Json(ConsensusResponse {
        status: status.to_string(),
        chain: ledger.get_chain().to_vec(),
    })
}

/// POST /action/evil - Chaos helper: drop the most recent block
///
/// The genesis block is never removed.
pub async fn pop_block(State(state): State<ApiState>) -> Json<PopResponse> {
    let mut ledger = state.ledger.write().await;
    match ledger.pop_block() {
        Some(block) => {
            log::warn!("dropped block {} on request", block.index);
            Json(PopResponse {
                status: "Snap done!".to_string(),
                element: Some(block),
            })
        }
        None => Json(PopResponse {
            status: "Nothing to do...".to_string(),
            element: None,
        }),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
