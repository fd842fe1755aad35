//! Canned base chain views for tests and local development.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use alloy_primitives::B256;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::chain::{BaseChainView, ChainViewResult};

/// Base chain view with a manually driven clock and a hash table of
/// visible blocks.
#[derive(Debug, Default)]
pub struct StaticChainView {
    timestamp: AtomicU64,
    hashes: RwLock<HashMap<u64, B256>>,
}

impl StaticChainView {
    /// A view whose clock reads `timestamp`.
    pub fn at(timestamp: u64) -> Self {
        Self {
            timestamp: AtomicU64::new(timestamp),
            hashes: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_timestamp(&self, timestamp: u64) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.timestamp.fetch_add(secs, Ordering::SeqCst);
    }

    /// Makes `hash` the canonical hash at `number`.
    pub fn insert_block_hash(&self, number: u64, hash: B256) {
        self.hashes.write().insert(number, hash);
    }
}

#[async_trait]
impl BaseChainView for StaticChainView {
    async fn current_timestamp(&self) -> ChainViewResult<u64> {
        Ok(self.timestamp.load(Ordering::SeqCst))
    }

    async fn block_hash(&self, number: u64) -> ChainViewResult<Option<B256>> {
        Ok(self.hashes.read().get(&number).copied())
    }
}
