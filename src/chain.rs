//! The append-only chain and the shared handle the HTTP layer writes through.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::model::{Block, MovieCheckout};
use crate::validate::{audit_chain, validate_block, Rejection};

/// Hook called after every accepted block.
pub trait AppendObserver: Send + Sync {
    fn block_appended(&self, block: &Block);
}

/// Dumps each appended block to the log at debug level.
#[derive(Debug, Default)]
pub struct LogObserver;

impl AppendObserver for LogObserver {
    fn block_appended(&self, block: &Block) {
        let data = serde_json::to_string_pretty(&block.data).unwrap_or_default();
        debug!(pos = block.pos, prev_hash = %block.prev_hash, "Data:{data}");
    }
}

/// Ordered blocks, genesis first. Never empty.
pub struct Chain {
    blocks: Vec<Block>,
    observer: Option<Arc<dyn AppendObserver>>,
}

impl Chain {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AppendObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a chain starts with its genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get(&self, pos: u64) -> Option<&Block> {
        usize::try_from(pos).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Build the successor of the tail for `data`, validate it and append it.
    pub fn append(&mut self, data: MovieCheckout) -> Result<Block, Rejection> {
        let candidate = Block::next(self.tail(), data);
        self.append_block(candidate)
    }

    /// Validate an externally built block against the tail and append it.
    pub fn append_block(&mut self, candidate: Block) -> Result<Block, Rejection> {
        if let Err(rejection) = validate_block(&candidate, self.tail()) {
            warn!(pos = candidate.pos, %rejection, "block rejected");
            return Err(rejection);
        }

        self.blocks.push(candidate.clone());
        info!(pos = candidate.pos, hash = %candidate.hash, "block appended");
        if let Some(observer) = &self.observer {
            observer.block_appended(&candidate);
        }
        Ok(candidate)
    }

    pub fn audit(&self) -> Vec<String> {
        audit_chain(&self.blocks)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle; every read and write goes through one lock.
#[derive(Clone)]
pub struct ChainHandle {
    inner: Arc<Mutex<Chain>>,
}

impl ChainHandle {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chain)),
        }
    }

    // Appends push a fully validated block in one step, so a poisoned
    // chain is still consistent.
    fn lock(&self) -> MutexGuard<'_, Chain> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, data: MovieCheckout) -> Result<Block, Rejection> {
        self.lock().append(data)
    }

    pub fn append_block(&self, candidate: Block) -> Result<Block, Rejection> {
        self.lock().append_block(candidate)
    }

    pub fn snapshot(&self) -> Vec<Block> {
        self.lock().blocks().to_vec()
    }

    pub fn tail(&self) -> Block {
        self.lock().tail().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn audit(&self) -> Vec<String> {
        self.lock().audit()
    }
}

impl Default for ChainHandle {
    fn default() -> Self {
        Self::new(Chain::new())
    }
}
