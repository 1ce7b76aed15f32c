//! Mini-Ledger node CLI
//!
//! Starts the HTTP ledger node, or evaluates a transaction-script pair
//! offline.

use clap::{Parser, Subcommand};
use mini_ledger::api::{create_router, ApiState};
use mini_ledger::core::Ledger;
use mini_ledger::network::NodeRegistry;
use mini_ledger::script;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// How long a gossip request may take before the peer is skipped
const GOSSIP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "ledger-node")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A minimal hash-linked ledger node", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP ledger node
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Bootstrap the chain from the scripted genesis transaction
        #[arg(long)]
        scripted: bool,

        /// Initial peers to register (comma-separated host:port or URLs)
        #[arg(long)]
        nodes: Option<String>,
    },

    /// Evaluate an unlock/lock script pair and print the transaction
    Script {
        /// Unlock script feeding values into the shared scope
        #[arg(long, default_value = "")]
        unlock: String,

        /// Lock script reading the scope and binding `output`
        #[arg(long)]
        lock: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            scripted,
            nodes,
        } => run_serve(port, scripted, nodes),

        Commands::Script { unlock, lock } => {
            let transaction = script::run_transaction(&unlock, &lock);
            println!("{}", serde_json::to_string_pretty(&transaction)?);
            Ok(())
        }
    }
}

fn run_serve(
    port: u16,
    scripted: bool,
    nodes: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let ledger = if scripted {
            Ledger::scripted()
        } else {
            Ledger::new()
        };

        let mut registry = NodeRegistry::new();
        if let Some(list) = nodes {
            for node in list.split(',') {
                if let Err(err) = registry.register(node.trim()) {
                    log::warn!("ignoring bootstrap node: {err}");
                }
            }
        }

        // A globally unique-enough address for this node
        let node_id = hex::encode(rand::random::<[u8; 16]>());

        let http = reqwest::Client::builder().timeout(GOSSIP_TIMEOUT).build()?;

        let state = ApiState {
            ledger: Arc::new(RwLock::new(ledger)),
            registry: Arc::new(RwLock::new(registry)),
            http,
            node_id: node_id.clone(),
        };

        let app = create_router(state);

        let addr = format!("0.0.0.0:{port}");
        log::info!("node {node_id} listening on http://localhost:{port}");
        log::info!("endpoints: /mine /chain /transactions/new /transactions/script /nodes/register /nodes/consensus");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
