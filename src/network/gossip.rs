//! Pull-based chain gossip
//!
//! Every known node is asked for its chain; whatever arrives intact becomes
//! a consensus candidate. A peer that is down, slow, or answering garbage
//! simply contributes nothing and never aborts collection for the others.

use crate::core::block::Block;
use serde::Deserialize;

/// Shape of a peer's `GET /chain` reply; extra fields are ignored
#[derive(Debug, Deserialize)]
struct ChainEnvelope {
    chain: Vec<Block>,
}

/// Collect the chains of all known nodes
pub async fn collect_chains(client: &reqwest::Client, nodes: &[String]) -> Vec<Vec<Block>> {
    let mut collected = Vec::new();

    for node in nodes {
        match fetch_chain(client, node).await {
            Ok(chain) => {
                log::debug!("collected chain of length {} from {node}", chain.len());
                collected.push(chain);
            }
            Err(err) => {
                log::warn!("skipping node {node}: {err}");
            }
        }
    }

    collected
}

/// Fetch one peer's chain
async fn fetch_chain(client: &reqwest::Client, node: &str) -> Result<Vec<Block>, reqwest::Error> {
    let url = format!("http://{node}/chain");
    let response = client.get(&url).send().await?.error_for_status()?;
    let envelope = response.json::<ChainEnvelope>().await?;
    Ok(envelope.chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_peer_contributes_nothing() {
        let client = reqwest::Client::new();
        // Port 1 is essentially never listening; the refusal must be absorbed
        let nodes = vec!["127.0.0.1:1".to_string()];
        let collected = collect_chains(&client, &nodes).await;
        assert!(collected.is_empty());
    }

    #[test]
    fn test_envelope_ignores_extra_fields() {
        let envelope: ChainEnvelope = serde_json::from_str(
            r#"{"chain":[{"index":1,"timestamp":1.0,"transactions":[{"data":"x"}],"previous_hash":"0"}],"is_valid":true}"#,
        )
        .unwrap();
        assert_eq!(envelope.chain.len(), 1);
    }
}
