//! Ledger implementation
//!
//! The ledger owns the chain of blocks and the pending-transaction buffer.
//! A fresh ledger bootstraps itself by mining the genesis block; every later
//! block is mined from the pending buffer, and only while the chain is
//! valid.

use crate::core::block::{Block, Transaction, GENESIS_PREVIOUS_HASH};
use crate::core::{consensus, validation};
use crate::script;
use chrono::Utc;
use std::fmt;

/// Data carried by the bootstrap transaction of every new chain
pub const GENESIS_MESSAGE: &str =
    "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";

/// Time source for block timestamps, substitutable for deterministic tests
pub trait Clock: Send + Sync {
    /// Current time as fractional seconds since the epoch
    fn now(&self) -> f64;
}

/// Wall-clock time source used outside of tests
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let now = Utc::now();
        now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6
    }
}

/// Which bootstrap transaction a new chain starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisKind {
    /// Genesis carries the bootstrap message as opaque data
    Opaque,
    /// Genesis carries a script pair whose output is the bootstrap message
    Scripted,
}

/// The ledger: chain, pending buffer, and the rules tying them together
pub struct Ledger {
    /// The chain of blocks, append-only except for consensus adoption
    chain: Vec<Block>,
    /// Transactions accepted but not yet committed to a block
    pending: Vec<Transaction>,
    /// Bootstrap flavor chosen at construction
    genesis: GenesisKind,
    /// Timestamp source
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Create a ledger with an opaque-data genesis block
    pub fn new() -> Self {
        Self::with_clock(GenesisKind::Opaque, SystemClock)
    }

    /// Create a ledger with a scripted genesis block
    pub fn scripted() -> Self {
        Self::with_clock(GenesisKind::Scripted, SystemClock)
    }

    /// Create a ledger with an explicit bootstrap flavor and time source
    pub fn with_clock(genesis: GenesisKind, clock: impl Clock + 'static) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            genesis,
            clock: Box::new(clock),
        };
        // Bootstrap: the first mine always creates the genesis block
        ledger.mine();
        ledger
    }

    /// The genesis block, if the chain has been bootstrapped
    pub fn genesis_block(&self) -> Option<&Block> {
        self.chain.first()
    }

    /// The most recent block
    pub fn last_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// Read-only snapshot of the chain
    pub fn get_chain(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions waiting for the next mined block
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue an opaque-data transaction for the next block
    ///
    /// Always succeeds and never touches the chain.
    pub fn add_transaction(&mut self, data: impl Into<String>) -> Transaction {
        let transaction = Transaction::Data { data: data.into() };
        self.pending.push(transaction.clone());
        transaction
    }

    /// Run an unlock/lock script pair and queue the resulting transaction
    ///
    /// Script failures are absorbed by the engine and surface only as a null
    /// `output`; the transaction itself is always queued.
    pub fn add_script_transaction(&mut self, unlock: &str, lock: &str) -> Transaction {
        let transaction = script::run_transaction(unlock, lock);
        self.pending.push(transaction.clone());
        transaction
    }

    /// Commit the pending buffer into the next block
    ///
    /// On an empty chain this unconditionally creates the genesis block. On
    /// a bootstrapped chain it creates a block only when the chain is valid
    /// and the buffer is non-empty; otherwise it returns `None` and leaves
    /// the queued transactions for a later attempt.
    pub fn mine(&mut self) -> Option<Block> {
        if self.chain.is_empty() {
            Some(self.create_genesis_block())
        } else if self.is_valid() {
            self.new_block(None)
        } else {
            None
        }
    }

    /// Validate the internal chain
    pub fn is_valid(&self) -> bool {
        validation::is_valid_chain(&self.chain)
    }

    /// Validate an externally supplied chain with the same rules
    pub fn is_valid_chain(chain: &[Block]) -> bool {
        validation::is_valid_chain(chain)
    }

    /// Digest of a block, for symmetry with external callers
    pub fn hash_of(&self, block: &Block) -> String {
        validation::hash_of(block)
    }

    /// Adopt the best of the collected peer chains, if any qualifies
    ///
    /// A candidate must be strictly longer than the local chain and
    /// internally valid; equal-length candidates never replace. Returns
    /// whether the local chain was replaced.
    pub fn evaluate_consensus(&mut self, collected_chains: Vec<Vec<Block>>) -> bool {
        match consensus::select_longest_valid(self.chain.len(), collected_chains) {
            Some(chain) => {
                log::info!(
                    "consensus: adopting peer chain of length {} over {}",
                    chain.len(),
                    self.chain.len()
                );
                self.chain = chain;
                true
            }
            None => false,
        }
    }

    /// Remove the most recent block, refusing to touch the genesis block
    pub fn pop_block(&mut self) -> Option<Block> {
        if self.chain.len() > 1 {
            self.chain.pop()
        } else {
            None
        }
    }

    fn create_genesis_block(&mut self) -> Block {
        let bootstrap = self.bootstrap_transaction();
        self.pending.push(bootstrap);
        self.new_block(Some(GENESIS_PREVIOUS_HASH.to_string()))
            .expect("pending buffer holds the bootstrap transaction")
    }

    fn bootstrap_transaction(&self) -> Transaction {
        match self.genesis {
            GenesisKind::Opaque => Transaction::Data {
                data: GENESIS_MESSAGE.to_string(),
            },
            GenesisKind::Scripted => {
                script::run_transaction("", &format!("output = {GENESIS_MESSAGE:?}"))
            }
        }
    }

    /// Build the next block from the pending buffer and append it
    ///
    /// Returns `None` when there is nothing to commit: mining requires at
    /// least one transaction.
    fn new_block(&mut self, previous_hash: Option<String>) -> Option<Block> {
        if self.pending.is_empty() {
            return None;
        }

        let previous_hash = previous_hash.unwrap_or_else(|| {
            validation::hash_of(self.chain.last().expect("chain is non-empty past bootstrap"))
        });

        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: self.clock.now(),
            transactions: std::mem::take(&mut self.pending),
            previous_hash,
        };

        self.chain.push(block.clone());
        Some(block)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("chain", &self.chain)
            .field("pending", &self.pending)
            .field("genesis", &self.genesis)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Frozen time source for reproducible blocks
    struct FixedClock(f64);

    impl Clock for FixedClock {
        fn now(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_new_ledger_has_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.get_chain().len(), 1);

        let genesis = ledger.genesis_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(
            genesis.transactions,
            vec![Transaction::Data {
                data: GENESIS_MESSAGE.to_string()
            }]
        );
        assert!(ledger.pending_transactions().is_empty());
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_genesis_timestamp_comes_from_clock() {
        let ledger = Ledger::with_clock(GenesisKind::Opaque, FixedClock(1231006505.0));
        assert_eq!(ledger.genesis_block().unwrap().timestamp, 1231006505.0);
    }

    #[test]
    fn test_scripted_genesis_binds_output() {
        let ledger = Ledger::scripted();
        let genesis = ledger.genesis_block().unwrap();
        match &genesis.transactions[0] {
            Transaction::Script { input, output, .. } => {
                assert_eq!(input, "");
                assert_eq!(output, &json!(GENESIS_MESSAGE));
            }
            other => panic!("expected scripted bootstrap, got {other:?}"),
        }
    }

    #[test]
    fn test_mine_without_pending_work_is_a_noop() {
        let mut ledger = Ledger::new();
        assert!(ledger.mine().is_none());
        assert_eq!(ledger.get_chain().len(), 1);
    }

    #[test]
    fn test_mine_commits_pending_transactions_in_order() {
        let mut ledger = Ledger::new();
        let first = ledger.add_transaction("first");
        let second = ledger.add_transaction("second");

        let block = ledger.mine().unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(block.transactions, vec![first, second]);
        assert_eq!(
            block.previous_hash,
            ledger.hash_of(ledger.genesis_block().unwrap())
        );
        assert_eq!(ledger.get_chain().len(), 2);
        assert!(ledger.pending_transactions().is_empty());
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_chain_links_hold_over_repeated_mining() {
        let mut ledger = Ledger::new();
        for i in 0..4 {
            ledger.add_transaction(format!("tx-{i}"));
            ledger.mine().unwrap();
        }

        let chain = ledger.get_chain();
        assert_eq!(chain.len(), 5);
        for i in 1..chain.len() {
            assert_eq!(chain[i].previous_hash, ledger.hash_of(&chain[i - 1]));
            assert_eq!(chain[i].index, i as u64 + 1);
        }
    }

    #[test]
    fn test_invalid_chain_blocks_mining() {
        let mut ledger = Ledger::new();
        ledger.add_transaction("queued");

        // Corrupt the bootstrapped chain behind the ledger's back
        ledger.chain[0].index = 99;

        assert!(!ledger.is_valid());
        assert!(ledger.mine().is_none());
        assert_eq!(ledger.get_chain().len(), 1);
        // The queued work survives for a future valid state
        assert_eq!(ledger.pending_transactions().len(), 1);
    }

    #[test]
    fn test_scripted_transactions_are_queued_even_on_failure() {
        let mut ledger = Ledger::new();
        let ok = ledger.add_script_transaction("a = 2", "output = a * 3");
        let broken = ledger.add_script_transaction("", "this is not valid code");

        match ok {
            Transaction::Script { output, .. } => assert_eq!(output, json!(6)),
            other => panic!("expected scripted transaction, got {other:?}"),
        }
        match broken {
            Transaction::Script { output, .. } => assert_eq!(output, json!(null)),
            other => panic!("expected scripted transaction, got {other:?}"),
        }
        assert_eq!(ledger.pending_transactions().len(), 2);
    }

    #[test]
    fn test_pop_block_refuses_genesis() {
        let mut ledger = Ledger::new();
        assert!(ledger.pop_block().is_none());

        ledger.add_transaction("doomed");
        ledger.mine().unwrap();
        let popped = ledger.pop_block().unwrap();
        assert_eq!(popped.index, 2);
        assert_eq!(ledger.get_chain().len(), 1);
        assert!(ledger.pop_block().is_none());
    }
}
